use anyhow::{anyhow, Result};
use chrono::FixedOffset;
use std::env;

use crate::aliases::MAX_QUOTA;
use crate::utils::datetime::offset_from_minutes;

const DEFAULT_DATABASE_URL: &str = "sqlite:./data/aliases.db";
const DEFAULT_HTTP_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
    /// Aliases a user may generate per quota day
    pub daily_quota: u32,
    /// Offset defining the calendar day for quota rows and tag date stamps
    pub utc_offset: FixedOffset,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let http_port = match non_blank_var("HTTP_PORT") {
            Some(port) => port.parse().map_err(|_| anyhow!("Invalid HTTP_PORT"))?,
            None => DEFAULT_HTTP_PORT,
        };

        let daily_quota = match non_blank_var("ALIAS_DAILY_QUOTA") {
            Some(quota) => {
                let quota: u32 = quota.parse().map_err(|_| anyhow!("Invalid ALIAS_DAILY_QUOTA"))?;
                if quota == 0 {
                    return Err(anyhow!("ALIAS_DAILY_QUOTA must be at least 1"));
                }
                quota
            }
            None => MAX_QUOTA,
        };

        let utc_offset = match non_blank_var("QUOTA_UTC_OFFSET_MINUTES") {
            Some(minutes) => {
                let minutes: i32 = minutes
                    .parse()
                    .map_err(|_| anyhow!("Invalid QUOTA_UTC_OFFSET_MINUTES"))?;
                offset_from_minutes(minutes)?
            }
            None => offset_from_minutes(0)?,
        };

        Ok(Config {
            telegram_bot_token: token,
            database_url: Self::database_url_from_env(),
            http_port,
            daily_quota,
            utc_offset,
        })
    }

    /// Database location only; tooling that never talks to Telegram uses this.
    pub fn database_url_from_env() -> String {
        non_blank_var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
