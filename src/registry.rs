//! Bulletin registry over the Messages table.
//!
//! The table holds at most one live record per target. That invariant is
//! enforced by a delete-then-append replace, which is *not* atomic: a crash
//! or concurrent reader between the two steps observes a transient "no
//! bulletin for this target" state, and two concurrent writers for the same
//! target can leave zero or two records. Callers accept this consistency
//! window by design; no locking is attempted.

use tracing::{debug, info};

use crate::error::Result;
use crate::models::Bulletin;
use crate::schema;
use crate::store::TableStore;
use crate::validation::InputValidator;

/// Reads and replaces the current bulletin for a target group.
pub struct MessageRegistry<'a> {
    store: &'a dyn TableStore,
    messages_table: String,
}

impl<'a> MessageRegistry<'a> {
    /// Create a registry over the given store and Messages table name.
    pub fn new(store: &'a dyn TableStore, messages_table: impl Into<String>) -> Self {
        Self { store, messages_table: messages_table.into() }
    }

    /// Best-known bulletin for the target, or `Ok(None)` when absent.
    ///
    /// If multiple historical records for one target exist (an invariant
    /// violation), the first row the table returns wins; there is no defined
    /// tie-break. This is a known limitation, not silently repaired here.
    pub fn get(&self, target: &str) -> Result<Option<Bulletin>> {
        let wanted = target.trim();
        if wanted.is_empty() {
            return Ok(None);
        }

        let rows = self.store.read_table(&self.messages_table)?;
        let (bulletins, _) = schema::collect_rows(&self.messages_table, &rows, schema::bulletin_from_row);

        Ok(bulletins.into_iter().find(|b| b.target.trim() == wanted))
    }

    /// Replace (or create) the bulletin for `bulletin.target`.
    ///
    /// When a prior record exists it is deleted first, then the new record
    /// is appended — a two-step, non-atomic swap. For a fresh target only
    /// the append happens; no delete is attempted.
    pub fn upsert(&self, bulletin: &Bulletin) -> Result<()> {
        InputValidator::validate_target(&bulletin.target)?;

        if let Some(position) = self.store.find_row(&self.messages_table, bulletin.target.trim())? {
            debug!(target = %bulletin.target, position, "deleting prior bulletin record");
            self.store.delete_row(&self.messages_table, position)?;
        }

        self.store.append_row(&self.messages_table, &schema::bulletin_to_values(bulletin))?;
        info!(target = %bulletin.target, "bulletin replaced");
        Ok(())
    }
}
