//! Aggregation of activity events into supervisory summaries.
//!
//! The engine joins Logs with Users, buckets events by calendar day and
//! hour, and produces the ranked summaries behind the dashboard views. The
//! Logs table is treated as unordered: recency is re-derived from the
//! timestamp field, never from row position.
//!
//! Consistency caveats, accepted by design: the Logs and Users reads inside
//! one call are not snapshot-isolated, so a join may observe an actor whose
//! user row is missing or stale. The join is orphan-safe — an event whose
//! actor matches no user is kept and displayed under its raw identifier —
//! so no event is ever lost to a referential-integrity violation.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use tracing::debug;

use crate::error::Result;
use crate::models::{ActivityCount, ActivitySummary, EventDetail, PeakHour, User, VolunteerStatus, Window};
use crate::schema::{self, TIMESTAMP_FORMAT};
use crate::store::TableStore;
use crate::validation::normalize_identifier;

/// One event after timestamp parsing and the user join.
struct JoinedEvent {
    actor_key: String,
    display_name: String,
    action: String,
    timestamp_raw: String,
    instant: Option<NaiveDateTime>,
}

/// Joins, filters and tallies the full event set.
pub struct AggregationEngine<'a> {
    store: &'a dyn TableStore,
    users_table: String,
    logs_table: String,
    checkin_label: String,
    peak_hour_count: usize,
}

impl<'a> AggregationEngine<'a> {
    /// Create an engine over the given store and table names.
    pub fn new(
        store: &'a dyn TableStore,
        users_table: impl Into<String>,
        logs_table: impl Into<String>,
    ) -> Self {
        Self {
            store,
            users_table: users_table.into(),
            logs_table: logs_table.into(),
            checkin_label: schema::CHECKIN_LABEL.to_string(),
            peak_hour_count: 4,
        }
    }

    /// Override the reserved check-in label.
    #[must_use]
    pub fn with_checkin_label(mut self, label: impl Into<String>) -> Self {
        self.checkin_label = label.into();
        self
    }

    /// Override how many peak hours the ranking keeps.
    #[must_use]
    pub const fn with_peak_hour_count(mut self, count: usize) -> Self {
        self.peak_hour_count = count;
        self
    }

    /// Summarize the event set over the given window.
    ///
    /// `today` is the caller's local notion of the current day. A failed
    /// fetch of either table fails the whole summary; partial results are
    /// never presented as complete.
    pub fn summarize(&self, window: Window, today: NaiveDate) -> Result<ActivitySummary> {
        let joined = self.join_events()?;

        // Window filter. "Today" keeps only events whose parsed instant
        // falls on the current day; unparseable timestamps cannot be placed
        // on a day and so only survive the all-time window.
        let filtered: Vec<&JoinedEvent> = joined
            .iter()
            .filter(|e| match window {
                Window::AllTime => true,
                Window::Today => e.instant.is_some_and(|i| i.date() == today),
            })
            .collect();

        let total_events = filtered.len();
        let distinct_actors =
            filtered.iter().map(|e| e.actor_key.as_str()).collect::<HashSet<_>>().len();
        let checkins = filtered.iter().filter(|e| e.action == self.checkin_label).count();
        let unparsed_events = filtered.iter().filter(|e| e.instant.is_none()).count();

        let ranking = rank_activities(&filtered);
        let peak_hours = rank_peak_hours(&filtered, self.peak_hour_count);
        let details = detail_listing(&filtered);

        debug!(%window, total_events, distinct_actors, checkins, "aggregated event set");

        Ok(ActivitySummary {
            window,
            total_events,
            distinct_actors,
            checkins,
            unparsed_events,
            ranking,
            peak_hours,
            details,
        })
    }

    /// Daily status of every volunteer under the given supervisor.
    ///
    /// Volunteers appear in Users-table order; each volunteer's action
    /// labels appear in Logs-table insertion order (the store guarantees no
    /// chronological row order, so this is explicitly insertion order).
    pub fn team_status(&self, supervisor: &User, today: NaiveDate) -> Result<Vec<VolunteerStatus>> {
        let user_rows = self.store.read_table(&self.users_table)?;
        let (users, _) = schema::collect_rows(&self.users_table, &user_rows, schema::user_from_row);

        let log_rows = self.store.read_table(&self.logs_table)?;
        let (events, _) = schema::collect_rows(&self.logs_table, &log_rows, schema::event_from_row);

        let supervisor_id = supervisor.id.trim();
        let team = users.into_iter().filter(|u| {
            u.supervisor_id.as_deref().map(str::trim) == Some(supervisor_id)
        });

        let mut statuses = Vec::new();
        for volunteer in team {
            let volunteer_key = normalize_identifier(&volunteer.id);
            let actions: Vec<String> = events
                .iter()
                .filter(|e| normalize_identifier(&e.actor_id) == volunteer_key)
                .filter(|e| parse_timestamp(&e.timestamp).is_some_and(|i| i.date() == today))
                .map(|e| e.action.clone())
                .collect();

            statuses.push(VolunteerStatus {
                active_today: !actions.is_empty(),
                actions,
                volunteer,
            });
        }

        Ok(statuses)
    }

    /// Read both tables and perform the orphan-safe left join.
    fn join_events(&self) -> Result<Vec<JoinedEvent>> {
        let log_rows = self.store.read_table(&self.logs_table)?;
        let (events, _) = schema::collect_rows(&self.logs_table, &log_rows, schema::event_from_row);

        let user_rows = self.store.read_table(&self.users_table)?;
        let (users, _) = schema::collect_rows(&self.users_table, &user_rows, schema::user_from_row);

        let names: HashMap<String, String> =
            users.into_iter().map(|u| (normalize_identifier(&u.id), u.name)).collect();

        let joined = events
            .into_iter()
            .map(|event| {
                let actor_key = normalize_identifier(&event.actor_id);
                let display_name = names.get(&actor_key).cloned().unwrap_or_else(|| event.actor_id.clone());
                JoinedEvent {
                    actor_key,
                    display_name,
                    instant: parse_timestamp(&event.timestamp),
                    action: event.action,
                    timestamp_raw: event.timestamp,
                }
            })
            .collect();

        Ok(joined)
    }
}

/// Parse a human-readable event timestamp into a comparable local instant.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).ok()
}

/// Group by action label and count, descending. Ties keep first-seen label
/// order (the sort is stable).
fn rank_activities(events: &[&JoinedEvent]) -> Vec<ActivityCount> {
    let mut first_seen: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for event in events {
        if !counts.contains_key(&event.action) {
            first_seen.push(event.action.clone());
        }
        *counts.entry(event.action.clone()).or_insert(0) += 1;
    }

    let mut ranking: Vec<ActivityCount> = first_seen
        .into_iter()
        .map(|action| {
            let count = counts.get(&action).copied().unwrap_or(0);
            ActivityCount { action, count }
        })
        .collect();

    ranking.sort_by(|a, b| b.count.cmp(&a.count));
    ranking
}

/// Bucket parseable events by hour of day and keep the busiest hours.
///
/// Ties are broken deterministically: the lower hour of day wins. Labels
/// describe half-open windows, `[H:00, H+1:00)`.
fn rank_peak_hours(events: &[&JoinedEvent], keep: usize) -> Vec<PeakHour> {
    let mut buckets = [0usize; 24];
    for event in events {
        if let Some(instant) = event.instant {
            buckets[instant.hour() as usize] += 1;
        }
    }

    let mut hours: Vec<(u32, usize)> = buckets
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(hour, count)| (hour as u32, *count))
        .collect();

    hours.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    hours.truncate(keep);

    hours
        .into_iter()
        .map(|(hour, count)| PeakHour {
            hour,
            label: format!("{hour:02}:00-{:02}:00", hour + 1),
            count,
        })
        .collect()
}

/// Joined event rows ordered most recent first; rows with unparseable
/// timestamps sink to the end in their original relative order.
fn detail_listing(events: &[&JoinedEvent]) -> Vec<EventDetail> {
    let mut ordered: Vec<&&JoinedEvent> = events.iter().collect();
    ordered.sort_by(|a, b| match (a.instant, b.instant) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    ordered
        .into_iter()
        .map(|e| EventDetail {
            display_name: e.display_name.clone(),
            action: e.action.clone(),
            timestamp: e.timestamp_raw.clone(),
        })
        .collect()
}
