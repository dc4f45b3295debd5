//! Supervisor-to-volunteer hierarchy derived from the Users table.

use tracing::debug;

use crate::error::Result;
use crate::models::{Role, Roster, Team, User};
use crate::schema;
use crate::store::TableStore;

/// Builds the two-level supervisor → volunteers mapping.
pub struct RosterBuilder<'a> {
    store: &'a dyn TableStore,
    users_table: String,
    include_unassigned: bool,
}

impl<'a> RosterBuilder<'a> {
    /// Create a builder over the given store and Users table name.
    pub fn new(store: &'a dyn TableStore, users_table: impl Into<String>) -> Self {
        Self { store, users_table: users_table.into(), include_unassigned: false }
    }

    /// Surface users whose supervisor reference matches no supervisor in a
    /// separate "unassigned" branch instead of hiding them.
    ///
    /// The historical behavior silently excludes such users from every
    /// branch; that remains the default.
    #[must_use]
    pub const fn include_unassigned(mut self, include: bool) -> Self {
        self.include_unassigned = include;
        self
    }

    /// Build the roster.
    ///
    /// Supervisors are users whose role is supervisor; each team lists the
    /// users whose trimmed supervisor identifier equals the supervisor's
    /// trimmed identifier. Both levels preserve table order.
    pub fn build(&self) -> Result<Roster> {
        let rows = self.store.read_table(&self.users_table)?;
        let (users, _) = schema::collect_rows(&self.users_table, &rows, schema::user_from_row);

        let supervisors: Vec<&User> =
            users.iter().filter(|u| u.role == Role::Supervisor).collect();

        let teams: Vec<Team> = supervisors
            .iter()
            .map(|sup| Team {
                supervisor: (*sup).clone(),
                volunteers: users
                    .iter()
                    .filter(|u| u.supervisor_id.as_deref().map(str::trim) == Some(sup.id.trim()))
                    .cloned()
                    .collect(),
            })
            .collect();

        let unassigned = if self.include_unassigned {
            users
                .iter()
                .filter(|u| {
                    u.supervisor_id.as_deref().is_some_and(|sup_id| {
                        let sup_id = sup_id.trim();
                        !sup_id.is_empty() && !supervisors.iter().any(|s| s.id.trim() == sup_id)
                    })
                })
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        debug!(teams = teams.len(), unassigned = unassigned.len(), "built roster");
        Ok(Roster { teams, unassigned })
    }
}
