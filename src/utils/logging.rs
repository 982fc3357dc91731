use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

/// Who ran a command, and where
#[derive(Debug, Clone, Copy)]
pub struct CommandActor<'a> {
    pub command: &'a str,
    pub user: &'a str,
    pub user_id: i64,
    pub chat_id: i64,
}

/// Logs command start with consistent format
pub fn log_command_start(actor: &CommandActor<'_>, details: Option<&str>) {
    match details {
        Some(d) => info!(
            "CMD_START: {} by {}({}) in chat {} - {}",
            actor.command, actor.user, actor.user_id, actor.chat_id, d
        ),
        None => info!(
            "CMD_START: {} by {}({}) in chat {}",
            actor.command, actor.user, actor.user_id, actor.chat_id
        ),
    }
}

/// Logs command completion with consistent format
pub fn log_command_success(actor: &CommandActor<'_>, details: &str) {
    info!(
        "CMD_SUCCESS: {} by {}({}) in chat {} - {}",
        actor.command, actor.user, actor.user_id, actor.chat_id, details
    );
}

/// Logs command errors with consistent format
pub fn log_command_error(actor: &CommandActor<'_>, error: &str) {
    error!(
        "CMD_ERROR: {} by {}({}) in chat {} - {}",
        actor.command, actor.user, actor.user_id, actor.chat_id, error
    );
}

/// Logs rejected user input. Only the length of the value is logged since it
/// is usually an email address.
pub fn log_validation_error(actor: &CommandActor<'_>, field: &str, value_len: usize, error: &str) {
    warn!(
        "VALIDATION_ERROR: {} - {} field ({} chars) invalid: {} - user {}({}) in chat {}",
        actor.command, field, value_len, error, actor.user, actor.user_id, actor.chat_id
    );
}

/// Logs quota ledger writes
pub fn log_quota_operation(operation: &str, user_id: i64, date: NaiveDate, details: &str) {
    debug!("QUOTA: {} for user {} on {} - {}", operation, user_id, date, details);
}

/// Logs database errors with consistent format
pub fn log_database_error(operation: &str, table: &str, error: &str, details: Option<&str>) {
    match details {
        Some(d) => error!("DB_ERROR: {} on {} failed: {} - {}", operation, table, error, d),
        None => error!("DB_ERROR: {} on {} failed: {}", operation, table, error),
    }
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
