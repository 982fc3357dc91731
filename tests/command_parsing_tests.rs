use gmail_alias_bot::bot::commands::{aliases::is_aliases_command, Command};
use teloxide::utils::command::BotCommands;

#[cfg(test)]
mod command_parsing_tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(Command::parse("/help", "testbot").unwrap(), Command::Help);
        assert_eq!(Command::parse("/start", "testbot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/quota", "testbot").unwrap(), Command::Quota);
    }

    #[test]
    fn test_aliases_command_with_arguments() {
        let result = Command::parse("/aliases john.doe@gmail.com 5", "testbot");
        assert_eq!(
            result.unwrap(),
            Command::Aliases {
                email: "john.doe@gmail.com".to_string(),
                count: "5".to_string(),
            }
        );
    }

    #[test]
    fn test_aliases_command_addressed_to_bot() {
        let result = Command::parse("/aliases@testbot jane@example.com 3", "testbot");
        match result.unwrap() {
            Command::Aliases { email, count } => {
                assert_eq!(email, "jane@example.com");
                assert_eq!(count, "3");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_aliases_count_is_left_unparsed() {
        // Range checks happen in the handler so the user gets a tailored reply
        let result = Command::parse("/aliases john@gmail.com lots", "testbot");
        assert!(matches!(result, Ok(Command::Aliases { ref count, .. }) if count == "lots"));
    }

    #[test]
    fn test_aliases_missing_arguments() {
        assert!(Command::parse("/aliases", "testbot").is_err());
        assert!(Command::parse("/aliases john@gmail.com", "testbot").is_err());
    }

    #[test]
    fn test_unparsed_aliases_calls_reach_usage_reply() {
        for input in ["/aliases", "/aliases john@gmail.com", "/aliases john@gmail.com 5 extra", "/aliases@testbot x"] {
            assert!(Command::parse(input, "testbot").is_err(), "{input} should not parse");
            assert!(is_aliases_command(input), "{input} should get the usage reply");
        }
        assert!(!is_aliases_command("/schedule"));
    }

    #[test]
    fn test_aliases_too_many_arguments() {
        assert!(Command::parse("/aliases john@gmail.com 5 extra", "testbot").is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert!(Command::parse("/schedule", "testbot").is_err());
        assert!(Command::parse("/aliasess", "testbot").is_err());
    }

    #[test]
    fn test_descriptions_list_every_command() {
        let text = Command::descriptions().to_string();
        for name in ["/help", "/start", "/quota", "/aliases"] {
            assert!(text.contains(name), "missing {name} in help text");
        }
    }
}
