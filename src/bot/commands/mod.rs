pub mod aliases;
pub mod quota;

use teloxide::types::Message;
use teloxide::utils::command::BotCommands;

use crate::utils::{logging::CommandActor, validation::telegram_user_id};

/// Callback data of the "check quota" inline button
pub const QUOTA_CALLBACK: &str = "alias_quota";

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Gmail alias bot commands:")]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "Show how many aliases you can still generate today")]
    Quota,
    #[command(description = "Generate aliases: /aliases <email> <count>", parse_with = "split")]
    Aliases { email: String, count: String },
}

/// Actor for a command message. `user_id` is 0 when the sender is missing or
/// its id does not fit the quota table; handlers reject such updates.
pub fn message_actor<'a>(command: &'a str, msg: &'a Message) -> CommandActor<'a> {
    let user = msg.from();
    CommandActor {
        command,
        user: user.and_then(|u| u.username.as_deref()).unwrap_or("unknown"),
        user_id: user.and_then(|u| telegram_user_id(u.id.0).ok()).unwrap_or(0),
        chat_id: msg.chat.id.0,
    }
}
