use anyhow::{anyhow, Result};

use crate::aliases::MAX_QUOTA;

/// Parses the alias count typed by the user.
///
/// Only the format and the absolute `1..=MAX_QUOTA` bound are checked here;
/// the bound against today's remaining quota is enforced by the alias service.
pub fn parse_alias_count(input: &str) -> Result<u32> {
    let input = input.trim();

    if input.is_empty() {
        return Err(anyhow!("Count cannot be empty"));
    }

    if !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow!("Count must be a whole number"));
    }

    let count: u32 = input
        .parse()
        .map_err(|_| anyhow!("Count must be between 1 and {}", MAX_QUOTA))?;

    if count == 0 || count > MAX_QUOTA {
        return Err(anyhow!("Count must be between 1 and {}", MAX_QUOTA));
    }

    Ok(count)
}

/// Telegram user ids are positive; 0 means the update carried no sender.
pub fn validate_telegram_user_id(user_id: i64) -> Result<()> {
    if user_id <= 0 {
        return Err(anyhow!("Command must be sent by a user"));
    }
    Ok(())
}

/// Converts a raw Telegram user id into the signed id used by the quota table.
pub fn telegram_user_id(raw: u64) -> Result<i64> {
    let user_id = i64::try_from(raw).map_err(|_| anyhow!("User id {} is out of range", raw))?;
    validate_telegram_user_id(user_id)?;
    Ok(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alias_count_valid() {
        assert_eq!(parse_alias_count("1").unwrap(), 1);
        assert_eq!(parse_alias_count(" 10 ").unwrap(), 10);
        assert_eq!(parse_alias_count("05").unwrap(), 5);
    }

    #[test]
    fn test_parse_alias_count_invalid() {
        for input in ["", "  ", "0", "11", "-3", "+3", "2.5", "five", "99999999999"] {
            assert!(parse_alias_count(input).is_err(), "should reject {input:?}");
        }
    }

    #[test]
    fn test_validate_telegram_user_id() {
        assert!(validate_telegram_user_id(123456789).is_ok());
        assert!(validate_telegram_user_id(0).is_err());
        assert!(validate_telegram_user_id(-100).is_err());
    }

    #[test]
    fn test_telegram_user_id_conversion() {
        assert_eq!(telegram_user_id(123456789).unwrap(), 123456789);
        assert_eq!(telegram_user_id(i64::MAX as u64).unwrap(), i64::MAX);
        assert!(telegram_user_id(0).is_err());
        assert!(telegram_user_id(i64::MAX as u64 + 1).is_err());
        assert!(telegram_user_id(u64::MAX).is_err());
    }
}
