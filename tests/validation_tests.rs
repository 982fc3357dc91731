use gmail_alias_bot::aliases::MAX_QUOTA;
use gmail_alias_bot::utils::validation::*;

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn test_every_count_in_range_is_accepted() {
        for count in 1..=MAX_QUOTA {
            assert_eq!(parse_alias_count(&count.to_string()).unwrap(), count);
        }
    }

    #[test]
    fn test_count_whitespace_handling() {
        assert_eq!(parse_alias_count("  7\t").unwrap(), 7);
        assert!(parse_alias_count("   ").is_err());
    }

    #[test]
    fn test_count_out_of_range() {
        for input in ["0", "00", "11", "100", "4294967296"] {
            let error = parse_alias_count(input).unwrap_err().to_string();
            assert!(error.contains("between 1 and 10"), "{input}: {error}");
        }
    }

    #[test]
    fn test_count_not_a_number() {
        for input in ["five", "3.0", "-1", "+2", "1e1", "٣"] {
            let error = parse_alias_count(input).unwrap_err().to_string();
            assert!(error.contains("whole number"), "{input}: {error}");
        }
    }

    #[test]
    fn test_telegram_user_ids() {
        let valid_ids = vec![1i64, 123456789, 7_000_000_000, i64::MAX];
        for id in valid_ids {
            assert!(validate_telegram_user_id(id).is_ok(), "Should accept user ID: {}", id);
        }

        let invalid_ids = vec![0i64, -1, -1001234567890, i64::MIN];
        for id in invalid_ids {
            assert!(validate_telegram_user_id(id).is_err(), "Should reject user ID: {}", id);
        }
    }
}
