/// Quota-day and usage-date helpers
pub mod datetime;
/// User-facing feedback messages
pub mod feedback;
/// Structured log line helpers
pub mod logging;
/// MarkdownV2 escaping
pub mod markdown;
/// User input parsing
pub mod validation;
