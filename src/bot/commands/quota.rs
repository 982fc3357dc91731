use teloxide::prelude::*;

use crate::bot::commands::message_actor;
use crate::bot::handlers::BotContext;
use crate::utils::{
    feedback::CommandFeedback,
    logging::{log_command_error, log_command_start, log_command_success, log_validation_error, CommandActor},
    validation::validate_telegram_user_id,
};

pub fn render_quota(remaining: u32, daily_limit: u32) -> String {
    if remaining == 0 {
        format!("You have used all {daily_limit} aliases for today. The quota resets at midnight.")
    } else {
        format!("You can generate {remaining} more of {daily_limit} aliases today.")
    }
}

/// Replies with the user's remaining quota; shared by `/quota` and the inline button.
pub async fn send_quota(bot: Bot, chat_id: ChatId, actor: &CommandActor<'_>, ctx: &BotContext) -> ResponseResult<()> {
    log_command_start(actor, None);
    let feedback = CommandFeedback::new(bot, chat_id);

    if let Err(e) = validate_telegram_user_id(actor.user_id) {
        log_validation_error(actor, "user_id", 0, &e.to_string());
        feedback.error(&e.to_string()).await?;
        return Ok(());
    }

    match ctx.service.remaining(actor.user_id, ctx.today()).await {
        Ok(remaining) => {
            feedback
                .info(&render_quota(remaining, ctx.service.ledger().daily_limit()))
                .await?;
            log_command_success(actor, &format!("{remaining} remaining"));
        }
        Err(e) => {
            log_command_error(actor, &e.to_string());
            feedback.retry_later().await?;
        }
    }

    Ok(())
}

pub async fn handle_quota(bot: Bot, msg: Message, ctx: &BotContext) -> ResponseResult<()> {
    let actor = message_actor("/quota", &msg);
    send_quota(bot, msg.chat.id, &actor, ctx).await
}
