//! Dashboard service facade.
//!
//! One entry point per dashboard interaction, each a synchronous call
//! returning plain data or a typed failure. The service is stateless
//! between calls: the acting user travels in an explicit [`SessionContext`]
//! instead of any global login state.

use chrono::Local;
use std::time::Instant;
use tracing::info;

use crate::activity::ActivityLogger;
use crate::aggregate::AggregationEngine;
use crate::config::AppConfig;
use crate::error::Result;
use crate::identity::IdentityResolver;
use crate::metrics::MetricsCollector;
use crate::models::{
    ActivitySummary, Bulletin, NewUser, Role, Roster, SessionContext, User, VolunteerStatus, Window,
};
use crate::registry::MessageRegistry;
use crate::roster::RosterBuilder;
use crate::schema::TASK_PREFIX;
use crate::store::TableStore;
use crate::validation::{normalize_identifier, InputValidator};

/// Facade over the table store for every dashboard operation.
pub struct DashboardService {
    store: Box<dyn TableStore>,
    users_table: String,
    messages_table: String,
    logs_table: String,
    checkin_label: String,
    peak_hour_count: usize,
    include_unassigned: bool,
    metrics: MetricsCollector,
}

impl DashboardService {
    /// Build a service over a store using the given configuration.
    #[must_use]
    pub fn new(store: Box<dyn TableStore>, config: &AppConfig) -> Self {
        Self {
            store,
            users_table: config.store.users_table.clone(),
            messages_table: config.store.messages_table.clone(),
            logs_table: config.store.logs_table.clone(),
            checkin_label: config.aggregation.checkin_label.clone(),
            peak_hour_count: config.aggregation.peak_hours,
            include_unassigned: config.roster.include_unassigned,
            metrics: MetricsCollector::default(),
        }
    }

    fn resolver(&self) -> IdentityResolver<'_> {
        IdentityResolver::new(&*self.store, &self.users_table)
    }

    fn logger(&self) -> ActivityLogger<'_> {
        ActivityLogger::new(&*self.store, &self.logs_table)
    }

    fn registry(&self) -> MessageRegistry<'_> {
        MessageRegistry::new(&*self.store, &self.messages_table)
    }

    fn engine(&self) -> AggregationEngine<'_> {
        AggregationEngine::new(&*self.store, &self.users_table, &self.logs_table)
            .with_checkin_label(&self.checkin_label)
            .with_peak_hour_count(self.peak_hour_count)
    }

    /// Resolve an identifier into a session context for subsequent calls.
    ///
    /// An unknown identifier is a normal outcome, not an error.
    pub fn login(&self, raw_id: &str) -> Result<Option<SessionContext>> {
        Ok(self.resolver().resolve(raw_id)?.map(SessionContext::new))
    }

    /// Record the acting user's daily check-in.
    pub fn check_in(&self, ctx: &SessionContext) -> Result<()> {
        self.logger().record(&ctx.user.id, &self.checkin_label)?;
        self.metrics.record_event_appended(&self.checkin_label);
        Ok(())
    }

    /// Record an arbitrary action (typically one of the bulletin's
    /// suggestions) for the acting user.
    pub fn log_action(&self, ctx: &SessionContext, action: &str) -> Result<()> {
        self.logger().record(&ctx.user.id, action)?;
        self.metrics.record_event_appended("action");
        Ok(())
    }

    /// Record completion of the bulletin's directed task, labeled with the
    /// task prefix so it stands apart from plain suggestions.
    pub fn log_directed_task(&self, ctx: &SessionContext, task: &str) -> Result<()> {
        InputValidator::validate_action_label(task)?;
        let label = format!("{TASK_PREFIX}{}", task.trim());
        self.logger().record(&ctx.user.id, &label)?;
        self.metrics.record_event_appended("task");
        Ok(())
    }

    /// Current bulletin for the acting user's group.
    pub fn group_bulletin(&self, ctx: &SessionContext) -> Result<Option<Bulletin>> {
        self.registry().get(&ctx.user.group_id)
    }

    /// Current bulletin for an explicit target.
    pub fn bulletin(&self, target: &str) -> Result<Option<Bulletin>> {
        self.registry().get(target)
    }

    /// Replace the bulletin for its target (delete-then-append, see the
    /// registry for the consistency window).
    pub fn publish_bulletin(&self, bulletin: &Bulletin) -> Result<()> {
        self.registry().upsert(bulletin)
    }

    /// The acting user's supervisor profile, when the reference resolves.
    ///
    /// A dangling or absent supervisor reference yields `Ok(None)`.
    pub fn supervisor_contact(&self, ctx: &SessionContext) -> Result<Option<User>> {
        match ctx.user.supervisor_id.as_deref() {
            Some(id) if !id.trim().is_empty() => self.resolver().resolve(id),
            _ => Ok(None),
        }
    }

    /// Daily status of the acting supervisor's volunteers.
    pub fn team_status(&self, ctx: &SessionContext) -> Result<Vec<VolunteerStatus>> {
        self.engine().team_status(&ctx.user, Local::now().date_naive())
    }

    /// Aggregated activity summary for the given window.
    pub fn activity_summary(&self, window: Window) -> Result<ActivitySummary> {
        let started = Instant::now();
        let summary = self.engine().summarize(window, Local::now().date_naive())?;
        self.metrics.record_aggregation(&window.to_string(), started.elapsed(), summary.total_events);
        Ok(summary)
    }

    /// The supervisor → volunteers hierarchy.
    pub fn roster(&self) -> Result<Roster> {
        RosterBuilder::new(&*self.store, &self.users_table)
            .include_unassigned(self.include_unassigned)
            .build()
    }

    /// Register a new campaign member.
    ///
    /// The identifier is normalized (trimmed, lowercased) before writing.
    /// A supervisor reference is persisted only for volunteers. The
    /// reference is not checked against the Users table; a dangling value
    /// is an accepted eventual-consistency risk.
    pub fn register_user(&self, new: &NewUser) -> Result<User> {
        InputValidator::validate_identifier(&new.id)?;
        InputValidator::validate_display_name(&new.name)?;
        InputValidator::validate_contact_number(&new.contact)?;

        let id = normalize_identifier(&new.id);
        let supervisor_id = if new.role == Role::Volunteer {
            new.supervisor_id.as_deref().map(normalize_identifier).filter(|s| !s.is_empty())
        } else {
            None
        };

        let user = User {
            id,
            name: new.name.trim().to_string(),
            role: new.role,
            contact: new.contact.trim().to_string(),
            group_id: new.group_id.trim().to_string(),
            supervisor_id,
        };

        let values = vec![
            user.id.clone(),
            user.name.clone(),
            user.contact.clone(),
            user.role.as_str().to_string(),
            user.group_id.clone(),
            user.supervisor_id.clone().unwrap_or_default(),
        ];
        self.store.append_row(&self.users_table, &values)?;

        info!(id = %user.id, role = %user.role, "registered user");
        Ok(user)
    }

    /// Reserved check-in label this service was configured with.
    #[must_use]
    pub fn checkin_label(&self) -> &str {
        &self.checkin_label
    }
}

impl std::fmt::Debug for DashboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardService")
            .field("users_table", &self.users_table)
            .field("messages_table", &self.messages_table)
            .field("logs_table", &self.logs_table)
            .finish_non_exhaustive()
    }
}
