use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use campaign_board::config::AppConfig;
use campaign_board::logging::{init_logging, OperationTimer};
use campaign_board::models::{Bulletin, NewUser, Role, Window};
use campaign_board::schema;
use campaign_board::service::DashboardService;
use campaign_board::store::CsvFileStore;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed an empty data directory with the expected table files
    Init,
    /// Print the aggregated activity report
    Report {
        /// Time window: "today" or "all"
        #[arg(short, long, default_value = "today")]
        window: String,

        /// Emit the summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Record a check-in for a user
    CheckIn {
        /// Identifier of the user checking in
        #[arg(short, long)]
        user: String,
    },
    /// Record an arbitrary action for a user
    LogAction {
        /// Identifier of the acting user
        #[arg(short, long)]
        user: String,

        /// Action label to record
        #[arg(short, long)]
        action: String,
    },
    /// Print the supervisor/volunteer roster
    Roster,
    /// Print today's status of a supervisor's team
    Team {
        /// Identifier of the supervisor
        #[arg(short, long)]
        supervisor: String,
    },
    /// Show the current bulletin for a target group
    ShowMessage {
        /// Target group identifier
        #[arg(short, long)]
        target: String,
    },
    /// Publish (replace) the bulletin for a target group
    SetMessage {
        /// Target group identifier
        #[arg(short, long)]
        target: String,

        /// Initial message text
        #[arg(short, long)]
        message: String,

        /// First suggested action
        #[arg(long, default_value = "")]
        suggestion1: String,

        /// Second suggested action
        #[arg(long, default_value = "")]
        suggestion2: String,

        /// Directed task text
        #[arg(long, default_value = "")]
        task: String,

        /// Reference date (free text)
        #[arg(long, default_value = "")]
        date: String,
    },
    /// Register a new campaign member
    Register {
        /// Identifier (e-mail)
        #[arg(short, long)]
        id: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Contact number
        #[arg(short, long)]
        contact: String,

        /// Role: volunteer, supervisor or administrator
        #[arg(short, long, default_value = "volunteer")]
        role: String,

        /// Group identifier
        #[arg(short, long, default_value = "")]
        group: String,

        /// Supervisor identifier (volunteers only)
        #[arg(short, long)]
        supervisor: Option<String>,
    },
}

fn main() -> Result<()> {
    let config = AppConfig::load()?;

    let _guard = init_logging(
        Some(&config.get_log_level()),
        config.logging.file_path.as_deref().map(std::path::Path::new),
    )?;

    info!("Starting campaign-board");

    let cli = Cli::parse();

    let store = CsvFileStore::new(&config.store.data_dir);

    if let Commands::Init = cli.command {
        return init_tables(&store, &config);
    }

    let service = DashboardService::new(Box::new(store), &config);

    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Report { window, json } => report(&service, &window, json)?,
        Commands::CheckIn { user } => {
            let ctx = login(&service, &user)?;
            service.check_in(&ctx)?;
            println!("Check-in recorded for {}", ctx.user.name);
        }
        Commands::LogAction { user, action } => {
            let ctx = login(&service, &user)?;
            service.log_action(&ctx, &action)?;
            println!("Action recorded for {}: {action}", ctx.user.name);
        }
        Commands::Roster => roster(&service)?,
        Commands::Team { supervisor } => team(&service, &supervisor)?,
        Commands::ShowMessage { target } => match service.bulletin(&target)? {
            Some(b) => {
                println!("[{}] {}", b.target, b.message);
                println!("  1. {}", b.suggestion_1);
                println!("  2. {}", b.suggestion_2);
                match b.directed_task() {
                    Some(task) => println!("  task: {task}"),
                    None => println!("  task: none"),
                }
            }
            None => println!("No bulletin for target {target}"),
        },
        Commands::SetMessage { target, message, suggestion1, suggestion2, task, date } => {
            let bulletin = Bulletin {
                target,
                message,
                suggestion_1: suggestion1,
                suggestion_2: suggestion2,
                task,
                reference_date: date,
            };
            service.publish_bulletin(&bulletin)?;
            println!("Bulletin published for target {}", bulletin.target);
        }
        Commands::Register { id, name, contact, role, group, supervisor } => {
            let role = Role::parse(&role).ok_or_else(|| anyhow!("unknown role: {role}"))?;
            let user = service.register_user(&NewUser {
                id,
                name,
                contact,
                role,
                group_id: group,
                supervisor_id: supervisor,
            })?;
            println!("Registered {} ({}) as {}", user.name, user.id, user.role);
        }
    }

    Ok(())
}

fn init_tables(store: &CsvFileStore, config: &AppConfig) -> Result<()> {
    std::fs::create_dir_all(&config.store.data_dir)
        .with_context(|| format!("creating data directory {}", config.store.data_dir))?;

    store.create_table(&config.store.users_table, &schema::users::ORDER)?;
    store.create_table(&config.store.messages_table, &schema::messages::ORDER)?;
    store.create_table(&config.store.logs_table, &schema::logs::ORDER)?;

    println!("Seeded tables under {}", config.store.data_dir);
    Ok(())
}

fn login(service: &DashboardService, raw_id: &str) -> Result<campaign_board::SessionContext> {
    service
        .login(raw_id)?
        .ok_or_else(|| anyhow!("no user found for identifier '{raw_id}'"))
}

fn parse_window(raw: &str) -> Result<Window> {
    match raw.trim().to_lowercase().as_str() {
        "today" => Ok(Window::Today),
        "all" | "all-time" | "alltime" => Ok(Window::AllTime),
        other => Err(anyhow!("unknown window '{other}' (expected 'today' or 'all')")),
    }
}

fn report(service: &DashboardService, window: &str, json: bool) -> Result<()> {
    let window = parse_window(window)?;
    let timer = OperationTimer::new("report");
    let summary = service.activity_summary(window)?;
    timer.finish();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Activity report ({window})");
    println!("  events:          {}", summary.total_events);
    println!("  active people:   {}", summary.distinct_actors);
    println!("  check-ins:       {}", summary.checkins);
    if summary.unparsed_events > 0 {
        println!("  unparsed times:  {}", summary.unparsed_events);
    }

    println!("Activity ranking:");
    for entry in &summary.ranking {
        println!("  {:>5}  {}", entry.count, entry.action);
    }

    println!("Peak hours:");
    for peak in &summary.peak_hours {
        println!("  {}  {} events", peak.label, peak.count);
    }

    println!("Latest activity:");
    for detail in summary.details.iter().take(20) {
        println!("  {}  {}  {}", detail.timestamp, detail.display_name, detail.action);
    }

    Ok(())
}

fn roster(service: &DashboardService) -> Result<()> {
    let roster = service.roster()?;

    if roster.teams.is_empty() {
        println!("No supervisors found.");
    }

    for team in &roster.teams {
        println!(
            "{} <{}> (group {}) - {} volunteers",
            team.supervisor.name,
            team.supervisor.id,
            team.supervisor.group_id,
            team.volunteers.len()
        );
        for volunteer in &team.volunteers {
            println!("  {} <{}> {}", volunteer.name, volunteer.id, volunteer.contact_digits());
        }
    }

    if !roster.unassigned.is_empty() {
        println!("Unassigned (dangling supervisor reference):");
        for user in &roster.unassigned {
            println!("  {} <{}>", user.name, user.id);
        }
    }

    Ok(())
}

fn team(service: &DashboardService, supervisor: &str) -> Result<()> {
    let ctx = login(service, supervisor)?;
    let statuses = service.team_status(&ctx)?;

    if statuses.is_empty() {
        println!("No volunteers report to {}", ctx.user.name);
        return Ok(());
    }

    for status in &statuses {
        let marker = if status.active_today { "*" } else { " " };
        println!("{marker} {} <{}>", status.volunteer.name, status.volunteer.id);
        for action in &status.actions {
            println!("    - {action}");
        }
        if status.actions.is_empty() {
            println!("    (no activity today)");
        }
    }

    Ok(())
}
