use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::{
    aliases::{handle_aliases, handle_aliases_usage},
    quota::handle_quota,
    Command,
};
use crate::bot::handlers::{BotContext, HandlerResult};

const WELCOME: &str = "📧 Welcome to the Gmail alias bot!\n\n\
Gmail ignores dots and +tags in addresses, so one inbox can receive mail sent to many aliases.\n\n\
Use /aliases <email> <count> to generate aliases.\n\
Use /quota to see how many you have left today.\n\
Use /help to see all commands.";

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: BotContext,
) -> HandlerResult {
    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string()).await?;
        }
        Command::Start => {
            bot.send_message(msg.chat.id, WELCOME).await?;
        }
        Command::Quota => {
            handle_quota(bot, msg, &ctx).await?;
        }
        Command::Aliases { email, count } => {
            handle_aliases(bot, msg, email, count, &ctx).await?;
        }
    }
    Ok(())
}

/// Commands that matched a known name but failed to parse.
pub async fn malformed_command_handler(bot: Bot, msg: Message, ctx: BotContext) -> HandlerResult {
    handle_aliases_usage(bot, msg, &ctx).await?;
    Ok(())
}
