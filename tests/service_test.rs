//! End-to-end tests for the dashboard service facade.

use campaign_board::config::AppConfig;
use campaign_board::models::{Bulletin, NewUser, Role, Window};
use campaign_board::schema::logs;
use campaign_board::service::DashboardService;
use campaign_board::store::{MemoryStore, TableStore};

fn values(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| (*c).to_string()).collect()
}

fn service() -> DashboardService {
    let store = MemoryStore::new();
    store.create_table("Users", &campaign_board::schema::users::ORDER);
    store.create_table("Messages", &campaign_board::schema::messages::ORDER);
    store.create_table("Logs", &logs::ORDER);
    store
        .append_row("Users", &values(&["ana@x.com", "Ana Silva", "61988887777", "Supervisor", "1", ""]))
        .unwrap();
    store
        .append_row(
            "Users",
            &values(&["bruno@x.com", "Bruno Costa", "+55 (61) 97777-6666", "Volunteer", "1", "ana@x.com"]),
        )
        .unwrap();

    DashboardService::new(Box::new(store), &AppConfig::default())
}

#[test]
fn login_resolves_known_user() {
    let service = service();

    let ctx = service.login(" BRUNO@x.com ").unwrap().unwrap();
    assert_eq!(ctx.user.name, "Bruno Costa");
    assert_eq!(ctx.role(), Role::Volunteer);
}

#[test]
fn login_unknown_user_is_none() {
    let service = service();
    assert!(service.login("nobody@x.com").unwrap().is_none());
}

#[test]
fn check_in_records_reserved_label() {
    let service = service();
    let ctx = service.login("bruno@x.com").unwrap().unwrap();

    service.check_in(&ctx).unwrap();

    let summary = service.activity_summary(Window::AllTime).unwrap();
    assert_eq!(summary.total_events, 1);
    assert_eq!(summary.checkins, 1);
    assert_eq!(summary.details[0].display_name, "Bruno Costa");
}

#[test]
fn directed_task_is_logged_with_prefix() {
    let service = service();
    let ctx = service.login("bruno@x.com").unwrap().unwrap();

    service.log_directed_task(&ctx, "Visit the market square").unwrap();

    let summary = service.activity_summary(Window::AllTime).unwrap();
    assert_eq!(summary.ranking[0].action, "TASK: Visit the market square");
}

#[test]
fn group_bulletin_follows_the_users_group() {
    let service = service();
    let ctx = service.login("bruno@x.com").unwrap().unwrap();

    assert!(service.group_bulletin(&ctx).unwrap().is_none());

    service
        .publish_bulletin(&Bulletin {
            target: "1".to_string(),
            message: "Door-knocking day!".to_string(),
            suggestion_1: "Share the post".to_string(),
            suggestion_2: "Invite a neighbor".to_string(),
            task: String::new(),
            reference_date: "15/03/2026".to_string(),
        })
        .unwrap();

    let bulletin = service.group_bulletin(&ctx).unwrap().unwrap();
    assert_eq!(bulletin.message, "Door-knocking day!");
}

#[test]
fn supervisor_contact_resolves_and_normalizes_digits() {
    let service = service();
    let ctx = service.login("bruno@x.com").unwrap().unwrap();

    let supervisor = service.supervisor_contact(&ctx).unwrap().unwrap();
    assert_eq!(supervisor.name, "Ana Silva");
    assert_eq!(supervisor.contact_digits(), "61988887777");

    // A supervisor has no supervisor of their own.
    let sup_ctx = service.login("ana@x.com").unwrap().unwrap();
    assert!(service.supervisor_contact(&sup_ctx).unwrap().is_none());
}

#[test]
fn volunteer_contact_digits_strip_formatting() {
    let service = service();
    let ctx = service.login("bruno@x.com").unwrap().unwrap();
    assert_eq!(ctx.user.contact_digits(), "5561977776666");
}

#[test]
fn register_user_normalizes_identifier() {
    let service = service();

    let user = service
        .register_user(&NewUser {
            id: "  CARLA@X.COM ".to_string(),
            name: "Carla Mota".to_string(),
            contact: "61955554444".to_string(),
            role: Role::Volunteer,
            group_id: "2".to_string(),
            supervisor_id: Some("ana@x.com".to_string()),
        })
        .unwrap();

    assert_eq!(user.id, "carla@x.com");

    let ctx = service.login("carla@x.com").unwrap().unwrap();
    assert_eq!(ctx.user.supervisor_id.as_deref(), Some("ana@x.com"));
}

#[test]
fn register_user_drops_supervisor_for_non_volunteers() {
    let service = service();

    let user = service
        .register_user(&NewUser {
            id: "dora@x.com".to_string(),
            name: "Dora Reis".to_string(),
            contact: "61944443333".to_string(),
            role: Role::Supervisor,
            group_id: "3".to_string(),
            supervisor_id: Some("ana@x.com".to_string()),
        })
        .unwrap();

    assert!(user.supervisor_id.is_none());
}

#[test]
fn register_user_validates_input() {
    let service = service();

    let bad_id = NewUser {
        id: "not-an-email".to_string(),
        name: "X".to_string(),
        contact: "61955554444".to_string(),
        role: Role::Volunteer,
        group_id: String::new(),
        supervisor_id: None,
    };
    assert!(service.register_user(&bad_id).is_err());

    let bad_contact = NewUser {
        id: "eva@x.com".to_string(),
        name: "Eva".to_string(),
        contact: "123".to_string(),
        role: Role::Volunteer,
        group_id: String::new(),
        supervisor_id: None,
    };
    assert!(service.register_user(&bad_contact).is_err());
}

#[test]
fn team_status_covers_registered_volunteers() {
    let service = service();
    let volunteer = service.login("bruno@x.com").unwrap().unwrap();
    service.check_in(&volunteer).unwrap();

    let supervisor = service.login("ana@x.com").unwrap().unwrap();
    let statuses = service.team_status(&supervisor).unwrap();

    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].volunteer.id, "bruno@x.com");
    assert!(statuses[0].active_today);
    assert_eq!(statuses[0].actions, vec![service.checkin_label().to_string()]);
}

#[test]
fn roster_reflects_the_seeded_hierarchy() {
    let service = service();

    let roster = service.roster().unwrap();
    assert_eq!(roster.teams.len(), 1);
    assert_eq!(roster.teams[0].supervisor.id, "ana@x.com");
    assert_eq!(roster.teams[0].volunteers.len(), 1);
}
