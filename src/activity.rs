//! Append-only activity logging into the Logs table.

use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::schema::{SORT_KEY_FORMAT, TIMESTAMP_FORMAT};
use crate::store::TableStore;
use crate::validation::InputValidator;

/// Appends immutable activity events.
///
/// Writes are fire-and-forget: on failure the caller is informed and nothing
/// is retried or rolled back. There is no de-duplication — recording the
/// same actor/action pair twice produces two rows. Appends never conflict
/// with concurrent writers beyond the store's own append semantics.
pub struct ActivityLogger<'a> {
    store: &'a dyn TableStore,
    logs_table: String,
}

impl<'a> ActivityLogger<'a> {
    /// Create a logger over the given store and Logs table name.
    pub fn new(store: &'a dyn TableStore, logs_table: impl Into<String>) -> Self {
        Self { store, logs_table: logs_table.into() }
    }

    /// Append one event stamped with the current local time.
    pub fn record(&self, actor_id: &str, action: &str) -> Result<()> {
        self.record_at(actor_id, action, Local::now().naive_local())
    }

    /// Append one event stamped with an explicit instant.
    ///
    /// The sort key is derived from the instant at second precision: keys
    /// are monotonic within a session but not guaranteed globally unique
    /// across concurrent writers.
    pub fn record_at(&self, actor_id: &str, action: &str, when: NaiveDateTime) -> Result<()> {
        InputValidator::validate_identifier(actor_id)?;
        InputValidator::validate_action_label(action)?;

        let values = vec![
            when.format(SORT_KEY_FORMAT).to_string(),
            actor_id.trim().to_string(),
            action.trim().to_string(),
            when.format(TIMESTAMP_FORMAT).to_string(),
        ];

        let started = std::time::Instant::now();
        let outcome = self.store.append_row(&self.logs_table, &values);
        MetricsCollector::default().record_store_operation(
            "append",
            &self.logs_table,
            started.elapsed(),
            outcome.is_ok(),
        );
        outcome?;

        info!(actor = actor_id, action, "recorded activity event");
        Ok(())
    }
}
