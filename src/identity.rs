//! Identity resolution against the Users table.

use tracing::debug;

use crate::error::Result;
use crate::models::User;
use crate::schema;
use crate::store::TableStore;
use crate::validation::normalize_identifier;

/// Looks up user profiles by case-insensitive identifier match.
pub struct IdentityResolver<'a> {
    store: &'a dyn TableStore,
    users_table: String,
}

impl<'a> IdentityResolver<'a> {
    /// Create a resolver over the given store and Users table name.
    pub fn new(store: &'a dyn TableStore, users_table: impl Into<String>) -> Self {
        Self { store, users_table: users_table.into() }
    }

    /// Resolve a raw identifier to a user profile.
    ///
    /// Both sides are trimmed and lowercased before comparison; the first
    /// match wins. A miss is a normal outcome (`Ok(None)`), never an error.
    /// Uniqueness of identifiers is a table invariant that is not
    /// re-verified here.
    pub fn resolve(&self, raw_id: &str) -> Result<Option<User>> {
        let wanted = normalize_identifier(raw_id);
        if wanted.is_empty() {
            return Ok(None);
        }

        let rows = self.store.read_table(&self.users_table)?;
        let (users, _) = schema::collect_rows(&self.users_table, &rows, schema::user_from_row);

        let matched = users.into_iter().find(|user| normalize_identifier(&user.id) == wanted);
        debug!(id = %wanted, found = matched.is_some(), "resolved identifier");
        Ok(matched)
    }
}
