//! Column-name contract for the backing spreadsheet tables.
//!
//! The store is schemaless; column names *are* the schema. These constants
//! must match the header row of each sheet. Row-to-record parsing lives here
//! so that missing required columns are rejected at the table boundary
//! instead of surfacing as ad-hoc errors deep inside aggregation.

use tracing::warn;

use crate::error::{BoardError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{Bulletin, LogEvent, Role, User};
use crate::store::Row;

/// Sortable event key format, second precision.
pub const SORT_KEY_FORMAT: &str = "%Y%m%d%H%M%S";

/// Human-readable timestamp format written to and parsed from the Logs table.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Reserved action label for the daily presence confirmation.
pub const CHECKIN_LABEL: &str = "Check-in";

/// Prefix applied to directed-task action labels when they are logged.
pub const TASK_PREFIX: &str = "TASK: ";

/// Columns of the Users table.
pub mod users {
    /// Unique identifier column
    pub const ID: &str = "ID_Usuario";
    /// Display name column
    pub const NAME: &str = "Nome";
    /// Contact number column
    pub const CONTACT: &str = "WhatsApp";
    /// Role column
    pub const ROLE: &str = "Cargo";
    /// Group identifier column
    pub const GROUP: &str = "ID_Grupo";
    /// Supervisor identifier column
    pub const SUPERVISOR: &str = "ID_Supervisor";

    /// Column order used when appending a row.
    pub const ORDER: [&str; 6] = [ID, NAME, CONTACT, ROLE, GROUP, SUPERVISOR];
}

/// Columns of the Messages table.
pub mod messages {
    /// Target group identifier column
    pub const TARGET: &str = "ID_Alvo";
    /// Initial message column
    pub const MESSAGE: &str = "Mensagem_Inicial";
    /// First suggested-action column
    pub const SUGGESTION_1: &str = "Sugestao_1";
    /// Second suggested-action column
    pub const SUGGESTION_2: &str = "Sugestao_2";
    /// Directed-task column
    pub const TASK: &str = "Tarefa_Direcionada";
    /// Reference date column
    pub const REFERENCE_DATE: &str = "Data_Referencia";

    /// Column order used when appending a row.
    pub const ORDER: [&str; 6] = [TARGET, MESSAGE, SUGGESTION_1, SUGGESTION_2, TASK, REFERENCE_DATE];
}

/// Columns of the Logs table.
pub mod logs {
    /// Timestamp-derived sort key column
    pub const KEY: &str = "ID_Log";
    /// Actor identifier column
    pub const ACTOR: &str = "ID_Usuario";
    /// Action label column
    pub const ACTION: &str = "Tipo_Acao";
    /// Human-readable timestamp column
    pub const TIMESTAMP: &str = "Data_Hora";

    /// Column order used when appending a row.
    pub const ORDER: [&str; 4] = [KEY, ACTOR, ACTION, TIMESTAMP];
}

fn required<'a>(row: &'a Row, table: &str, position: usize, column: &str) -> Result<&'a str> {
    match row.get(column).map(String::as_str) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim()),
        Some(_) => Err(BoardError::MalformedRecord {
            table: table.to_string(),
            row: position,
            cause: format!("empty required column '{column}'"),
        }),
        None => Err(BoardError::MalformedRecord {
            table: table.to_string(),
            row: position,
            cause: format!("missing required column '{column}'"),
        }),
    }
}

fn optional(row: &Row, column: &str) -> String {
    row.get(column).map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Parse one Users row. Id, name and role are required.
pub fn user_from_row(table: &str, position: usize, row: &Row) -> Result<User> {
    let id = required(row, table, position, users::ID)?;
    let name = required(row, table, position, users::NAME)?;
    let role_raw = required(row, table, position, users::ROLE)?;
    let role = Role::parse(role_raw).ok_or_else(|| BoardError::MalformedRecord {
        table: table.to_string(),
        row: position,
        cause: format!("unknown role '{role_raw}'"),
    })?;
    let supervisor = optional(row, users::SUPERVISOR);

    Ok(User {
        id: id.to_string(),
        name: name.to_string(),
        role,
        contact: optional(row, users::CONTACT),
        group_id: optional(row, users::GROUP),
        supervisor_id: if supervisor.is_empty() { None } else { Some(supervisor) },
    })
}

/// Parse one Messages row. Only the target is required.
pub fn bulletin_from_row(table: &str, position: usize, row: &Row) -> Result<Bulletin> {
    let target = required(row, table, position, messages::TARGET)?;

    Ok(Bulletin {
        target: target.to_string(),
        message: optional(row, messages::MESSAGE),
        suggestion_1: optional(row, messages::SUGGESTION_1),
        suggestion_2: optional(row, messages::SUGGESTION_2),
        task: optional(row, messages::TASK),
        reference_date: optional(row, messages::REFERENCE_DATE),
    })
}

/// Serialize a bulletin into Messages column order.
#[must_use]
pub fn bulletin_to_values(bulletin: &Bulletin) -> Vec<String> {
    vec![
        bulletin.target.clone(),
        bulletin.message.clone(),
        bulletin.suggestion_1.clone(),
        bulletin.suggestion_2.clone(),
        bulletin.task.clone(),
        bulletin.reference_date.clone(),
    ]
}

/// Parse one Logs row. Actor, action and timestamp are required; the sort
/// key is informational and tolerated when absent.
pub fn event_from_row(table: &str, position: usize, row: &Row) -> Result<LogEvent> {
    Ok(LogEvent {
        key: optional(row, logs::KEY),
        actor_id: required(row, table, position, logs::ACTOR)?.to_string(),
        action: required(row, table, position, logs::ACTION)?.to_string(),
        timestamp: required(row, table, position, logs::TIMESTAMP)?.to_string(),
    })
}

/// Parse every row of a table, quarantining malformed ones.
///
/// Malformed rows are logged and counted, never propagated: one bad row must
/// not abort a whole aggregation. Returns the parsed records in table order
/// together with the number of quarantined rows.
pub fn collect_rows<T>(
    table: &str,
    rows: &[Row],
    parse: impl Fn(&str, usize, &Row) -> Result<T>,
) -> (Vec<T>, usize) {
    let mut records = Vec::with_capacity(rows.len());
    let mut quarantined = 0;

    for (position, row) in rows.iter().enumerate() {
        match parse(table, position, row) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(table, row = position, %err, "quarantined malformed row");
                quarantined += 1;
            }
        }
    }

    MetricsCollector::default().record_rows_quarantined(table, quarantined);
    (records, quarantined)
}
