use teloxide::prelude::*;

use crate::bot::commands::{quota::send_quota, QUOTA_CALLBACK};
use crate::bot::handlers::{BotContext, HandlerResult};
use crate::utils::{logging::CommandActor, validation::telegram_user_id};

pub async fn callback_handler(bot: Bot, q: CallbackQuery, ctx: BotContext) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    let user_id = match telegram_user_id(q.from.id.0) {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::warn!("Ignoring callback query {}: {}", q.id, e);
            return Ok(());
        }
    };
    let chat_id = q
        .message
        .as_ref()
        .map(|m| m.chat.id)
        .unwrap_or(ChatId(user_id));

    match q.data.as_deref() {
        Some(QUOTA_CALLBACK) => {
            let actor = CommandActor {
                command: "quota_button",
                user: q.from.username.as_deref().unwrap_or("unknown"),
                user_id,
                chat_id: chat_id.0,
            };
            send_quota(bot, chat_id, &actor, &ctx).await?;
        }
        other => {
            tracing::warn!("Ignoring unknown callback data {:?} from user {}", other, user_id);
        }
    }

    Ok(())
}
