use anyhow::{anyhow, Result};
use chrono::{FixedOffset, NaiveDate, Utc};

/// Largest UTC offset accepted for the quota day, in minutes.
pub const MAX_OFFSET_MINUTES: i32 = 14 * 60;

pub fn offset_from_minutes(minutes: i32) -> Result<FixedOffset> {
    if minutes.abs() > MAX_OFFSET_MINUTES {
        return Err(anyhow!("UTC offset must be within ±{} minutes", MAX_OFFSET_MINUTES));
    }
    FixedOffset::east_opt(minutes * 60).ok_or_else(|| anyhow!("Invalid UTC offset: {} minutes", minutes))
}

/// Calendar day at `offset`; quota rows and alias tags are keyed by it.
pub fn today_at(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

pub fn format_usage_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_usage_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date '{}', expected YYYY-MM-DD", input.trim()))
}
