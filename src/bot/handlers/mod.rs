pub mod callback;
pub mod message;

use chrono::{FixedOffset, NaiveDate};
use std::sync::Arc;
use teloxide::{dispatching::UpdateHandler, prelude::*};

use crate::bot::commands::{aliases::is_aliases_command, Command};
use crate::services::alias_service::AliasService;
use crate::utils::datetime::today_at;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct BotContext {
    pub service: Arc<AliasService>,
    pub utc_offset: FixedOffset,
}

impl BotContext {
    /// Current quota day
    pub fn today(&self) -> NaiveDate {
        today_at(self.utc_offset)
    }
}

pub struct BotHandler {
    pub ctx: BotContext,
}

impl BotHandler {
    pub fn new(service: Arc<AliasService>, utc_offset: FixedOffset) -> Self {
        Self {
            ctx: BotContext { service, utc_offset },
        }
    }

    pub fn schema(&self) -> UpdateHandler<HandlerError> {
        let ctx = self.ctx.clone();
        let ctx_malformed = self.ctx.clone();
        let ctx_callback = self.ctx.clone();

        dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let ctx = ctx.clone();
                        async move { message::command_handler(bot, msg, cmd, ctx).await }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| msg.text().is_some_and(is_aliases_command))
                    .endpoint(move |bot: Bot, msg: Message| {
                        let ctx = ctx_malformed.clone();
                        async move { message::malformed_command_handler(bot, msg, ctx).await }
                    }),
            )
            .branch(Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                let ctx = ctx_callback.clone();
                async move { callback::callback_handler(bot, q, ctx).await }
            }))
    }
}
