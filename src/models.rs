//! Data models for the campaign dashboard.
//!
//! This module contains all data structures used throughout the application:
//! user profiles, group bulletins, activity events, and the summary values
//! produced by the aggregation engine.

use serde::{Deserialize, Serialize};

use crate::validation::normalize_contact;

/// Role a user holds in the campaign hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Field volunteer, reports to a supervisor
    Volunteer,
    /// Team supervisor, oversees a set of volunteers
    Supervisor,
    /// Global administrator
    Administrator,
}

impl Role {
    /// Parse a role cell as it appears in the Users table.
    ///
    /// Matching is trimmed and case-insensitive, and tolerates the label
    /// variants seen in production sheets ("voluntário", "admin").
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "volunteer" | "voluntario" | "voluntário" => Some(Self::Volunteer),
            "supervisor" => Some(Self::Supervisor),
            "administrator" | "admin" => Some(Self::Administrator),
            _ => None,
        }
    }

    /// Canonical lowercase label used when writing rows.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Volunteer => "volunteer",
            Self::Supervisor => "supervisor",
            Self::Administrator => "administrator",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered campaign member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (e-mail style, stored lowercase)
    pub id: String,
    /// Display name
    pub name: String,
    /// Role in the hierarchy
    pub role: Role,
    /// Free-text contact number; normalize before use
    pub contact: String,
    /// Group the user belongs to
    pub group_id: String,
    /// Identifier of the user's supervisor; set only for volunteers
    pub supervisor_id: Option<String>,
}

impl User {
    /// First word of the display name, used for informal greetings.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    /// Contact number reduced to its digits, suitable for dialing links.
    #[must_use]
    pub fn contact_digits(&self) -> String {
        normalize_contact(&self.contact)
    }
}

/// Input for registering a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique identifier (e-mail style)
    pub id: String,
    /// Display name
    pub name: String,
    /// Contact number
    pub contact: String,
    /// Role in the hierarchy
    pub role: Role,
    /// Group the user belongs to
    pub group_id: String,
    /// Supervisor identifier; persisted only when the role is volunteer
    pub supervisor_id: Option<String>,
}

/// The instructional message tuple for one target group.
///
/// At most one live record per target exists in the Messages table; the
/// registry enforces this with a delete-then-append replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bulletin {
    /// Group or individual the bulletin applies to
    pub target: String,
    /// Opening message shown to the group
    pub message: String,
    /// First suggested action label
    pub suggestion_1: String,
    /// Second suggested action label
    pub suggestion_2: String,
    /// Directed task text; may be empty
    pub task: String,
    /// Free-text reference date
    pub reference_date: String,
}

impl Bulletin {
    /// The directed task, if one is actually set.
    ///
    /// Spreadsheet exports render empty cells as "nan", so both empty and
    /// nan-like values count as absent.
    #[must_use]
    pub fn directed_task(&self) -> Option<&str> {
        let task = self.task.trim();
        if task.is_empty() || task.eq_ignore_ascii_case("nan") {
            None
        } else {
            Some(task)
        }
    }
}

/// One immutable activity event from the Logs table.
///
/// Events are append-only and never mutated. The table gives no ordering
/// guarantee; recency must be re-derived from the timestamp field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    /// Timestamp-derived sort key; monotonic within a session, not globally unique
    pub key: String,
    /// Identifier of the acting user
    pub actor_id: String,
    /// Action label: the reserved check-in label or a free suggestion/task string
    pub action: String,
    /// Human-readable timestamp as written to the sheet
    pub timestamp: String,
}

/// Time window applied before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    /// Only events on the current calendar day
    Today,
    /// Every event in the table
    AllTime,
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Today => f.write_str("today"),
            Self::AllTime => f.write_str("all-time"),
        }
    }
}

/// Occurrence count for one action label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCount {
    /// Action label
    pub action: String,
    /// Number of occurrences in the window
    pub count: usize,
}

/// One hour-of-day bucket in the peak-hour ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakHour {
    /// Hour of day, 0-23
    pub hour: u32,
    /// Half-open window label, e.g. "09:00-10:00"
    pub label: String,
    /// Number of events in the hour
    pub count: usize,
}

/// One row of the joined, filtered event listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDetail {
    /// Actor's display name, or the raw actor id when no user matches
    pub display_name: String,
    /// Action label
    pub action: String,
    /// Raw timestamp string from the source table
    pub timestamp: String,
}

/// Aggregated view over the Logs table for one time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Window the summary covers
    pub window: Window,
    /// Total event count in the window
    pub total_events: usize,
    /// Number of distinct actors in the window
    pub distinct_actors: usize,
    /// Events whose label exactly equals the reserved check-in label
    pub checkins: usize,
    /// Events retained in the window whose timestamp could not be parsed
    pub unparsed_events: usize,
    /// Action labels ranked by occurrence count, descending
    pub ranking: Vec<ActivityCount>,
    /// Busiest hours of the day, best first
    pub peak_hours: Vec<PeakHour>,
    /// Joined event rows, most recent first (unparseable timestamps last)
    pub details: Vec<EventDetail>,
}

/// Daily status of one volunteer, as seen by their supervisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerStatus {
    /// The volunteer
    pub volunteer: User,
    /// True when at least one event exists for the volunteer today
    pub active_today: bool,
    /// Today's action labels in source-table insertion order.
    ///
    /// The store does not guarantee chronological row order, so this is
    /// insertion order, not necessarily temporal order.
    pub actions: Vec<String>,
}

/// One supervisor and their volunteers, in table order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// The supervisor
    pub supervisor: User,
    /// Volunteers reporting to this supervisor, in table order
    pub volunteers: Vec<User>,
}

/// The supervisor-to-volunteer hierarchy derived from the Users table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    /// Teams in the order their supervisors appear in the table
    pub teams: Vec<Team>,
    /// Users whose supervisor reference matches no supervisor.
    ///
    /// Populated only when the roster is built with `include_unassigned`;
    /// otherwise such users are silently absent from every branch.
    pub unassigned: Vec<User>,
}

/// The acting user for one dashboard interaction.
///
/// The core is stateless between calls; there is no global "logged-in user".
/// Callers resolve identity once and pass the context to every operation
/// that needs an actor.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// The resolved acting user
    pub user: User,
}

impl SessionContext {
    /// Build a context around a resolved user.
    #[must_use]
    pub const fn new(user: User) -> Self {
        Self { user }
    }

    /// Role of the acting user.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.user.role
    }
}
