use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, ParseMode};

use crate::utils::markdown::escape_markdown;

/// Feedback types for different command outcomes
#[derive(Debug, Clone, Copy)]
pub enum FeedbackType {
    Success,
    Warning,
    Error,
    Info,
}

impl FeedbackType {
    fn emoji(self) -> &'static str {
        match self {
            FeedbackType::Success => "✅",
            FeedbackType::Warning => "⚠️",
            FeedbackType::Error => "❌",
            FeedbackType::Info => "ℹ️",
        }
    }

    /// Plain message with the type's emoji, escaped for MarkdownV2.
    pub fn format(self, message: &str) -> String {
        format!("{} {}", self.emoji(), escape_markdown(message))
    }
}

/// Centralized feedback system for bot commands
pub struct CommandFeedback {
    bot: Bot,
    chat_id: ChatId,
}

impl CommandFeedback {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    /// Send immediate feedback message
    pub async fn send(&self, feedback_type: FeedbackType, message: &str) -> ResponseResult<Message> {
        self.bot
            .send_message(self.chat_id, feedback_type.format(message))
            .parse_mode(ParseMode::MarkdownV2)
            .await
    }

    /// Send pre-rendered MarkdownV2 with an inline keyboard
    pub async fn send_markdown(&self, text: String, keyboard: InlineKeyboardMarkup) -> ResponseResult<Message> {
        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::MarkdownV2)
            .reply_markup(keyboard)
            .await
    }

    pub async fn success(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Success, message).await
    }

    pub async fn error(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Error, message).await
    }

    pub async fn warning(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Warning, message).await
    }

    pub async fn info(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Info, message).await
    }

    /// Send validation error with helpful suggestion
    pub async fn validation_error(&self, error: &str, suggestion: &str) -> ResponseResult<Message> {
        let message = format!("{error}\n\n💡 Suggestion: {suggestion}");
        self.send(FeedbackType::Error, &message).await
    }

    /// Storage failures: nothing was charged, the user may simply retry
    pub async fn retry_later(&self) -> ResponseResult<Message> {
        self.error("Something went wrong on our side. No quota was used, please try again in a moment.")
            .await
    }
}
