/// Generate-and-charge request flow used by the bot
pub mod alias_service;
/// HTTP health endpoints
pub mod health;
/// Daily per-user alias quota
pub mod quota;
