use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::aliases::{AliasError, InvalidReason};
use crate::bot::commands::{message_actor, QUOTA_CALLBACK};
use crate::bot::handlers::BotContext;
use crate::services::alias_service::{AliasBatch, RequestError};
use crate::utils::{
    feedback::CommandFeedback,
    logging::{log_command_error, log_command_start, log_command_success, log_validation_error},
    markdown::{code_block, escape_markdown},
    validation::{parse_alias_count, validate_telegram_user_id},
};

const ADDRESS_SUGGESTION: &str = "Send a full address, for example: /aliases john.doe@gmail.com 5";

/// Formats a delivered batch as MarkdownV2.
pub fn render_batch(batch: &AliasBatch, requested: u32, daily_limit: u32) -> String {
    let delivered = batch.aliases.len();
    let mut text = format!(
        "✅ *{}*\n\n",
        escape_markdown(&format!("Generated {delivered} aliases"))
    );

    text.push_str(&code_block(batch.aliases.iter().map(|alias| alias.address())));
    text.push_str("\n\n");

    if delivered < requested as usize {
        text.push_str(&escape_markdown(&format!(
            "Only {delivered} of the {requested} requested aliases fit into today's quota."
        )));
        text.push_str("\n\n");
    }

    if !batch.folding_domain {
        let domain = batch.aliases.first().map_or("", |alias| alias.domain.as_str());
        text.push_str(&format!(
            "⚠️ {}\n\n",
            escape_markdown(&format!(
                "{domain} is not a Gmail domain, so your provider may not deliver dot or plus aliases to the same inbox."
            ))
        ));
    }

    text.push_str(&escape_markdown(&format!(
        "Remaining today: {} of {}",
        batch.remaining, daily_limit
    )));
    text
}

fn invalid_address_message(reason: InvalidReason) -> String {
    format!("Invalid email address: {reason}")
}

/// Whether `text` invokes `/aliases`, with or without a `@botname` suffix.
pub fn is_aliases_command(text: &str) -> bool {
    let command = text.split_whitespace().next().unwrap_or_default();
    let name = command.split('@').next().unwrap_or_default();
    name.eq_ignore_ascii_case("/aliases")
}

/// Reply for an `/aliases` call whose arguments did not parse.
pub fn usage_hint(max: u32) -> String {
    if max == 0 {
        "Usage: /aliases <email> <count>. Your daily quota is used up, come back tomorrow.".to_string()
    } else {
        format!("Usage: /aliases <email> <count>, with a count between 1 and {max}. For example: /aliases john.doe@gmail.com {max}")
    }
}

/// Answers `/aliases` messages with missing or extra arguments.
pub async fn handle_aliases_usage(bot: Bot, msg: Message, ctx: &BotContext) -> ResponseResult<()> {
    let actor = message_actor("/aliases", &msg);
    let arguments = msg.text().unwrap_or_default();
    log_validation_error(&actor, "arguments", arguments.len(), "expected <email> <count>");

    let feedback = CommandFeedback::new(bot, msg.chat.id);
    if let Err(e) = validate_telegram_user_id(actor.user_id) {
        feedback.error(&e.to_string()).await?;
        return Ok(());
    }

    let service = &ctx.service;
    match service.remaining(actor.user_id, ctx.today()).await {
        Ok(remaining) => {
            feedback
                .validation_error(
                    "The /aliases command needs an email address and a count.",
                    &usage_hint(service.max_request(remaining)),
                )
                .await?;
        }
        Err(e) => {
            log_command_error(&actor, &e.to_string());
            feedback.retry_later().await?;
        }
    }

    Ok(())
}

pub async fn handle_aliases(
    bot: Bot,
    msg: Message,
    email: String,
    count: String,
    ctx: &BotContext,
) -> ResponseResult<()> {
    let actor = message_actor("/aliases", &msg);
    log_command_start(&actor, Some(&format!("count '{count}'")));

    let feedback = CommandFeedback::new(bot, msg.chat.id);
    let service = &ctx.service;
    let today = ctx.today();

    if let Err(e) = validate_telegram_user_id(actor.user_id) {
        log_validation_error(&actor, "user_id", 0, &e.to_string());
        feedback.error(&e.to_string()).await?;
        return Ok(());
    }

    let requested = match parse_alias_count(&count) {
        Ok(requested) => requested,
        Err(e) => {
            log_validation_error(&actor, "count", count.len(), &e.to_string());
            match service.remaining(actor.user_id, today).await {
                Ok(0) => {
                    feedback.warning("Your daily alias quota is used up. Come back tomorrow!").await?;
                }
                Ok(remaining) => {
                    let suggestion = format!(
                        "Choose a number between 1 and {}.",
                        service.max_request(remaining)
                    );
                    feedback.validation_error(&e.to_string(), &suggestion).await?;
                }
                Err(storage) => {
                    log_command_error(&actor, &storage.to_string());
                    feedback.retry_later().await?;
                }
            }
            return Ok(());
        }
    };

    match service.request(actor.user_id, today, &email, requested).await {
        Ok(batch) => {
            let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
                "📊 Check quota",
                QUOTA_CALLBACK,
            )]]);
            let text = render_batch(&batch, requested, service.ledger().daily_limit());
            feedback.send_markdown(text, keyboard).await?;
            log_command_success(
                &actor,
                &format!("{} aliases, {} remaining", batch.aliases.len(), batch.remaining),
            );
        }
        Err(RequestError::Alias(AliasError::MalformedAddress(reason))) => {
            log_validation_error(&actor, "email", email.len(), &reason.to_string());
            feedback
                .validation_error(&invalid_address_message(reason), ADDRESS_SUGGESTION)
                .await?;
        }
        Err(RequestError::Alias(AliasError::InvalidCount { requested, max })) => {
            log_validation_error(&actor, "count", count.len(), &format!("{requested} > {max}"));
            feedback
                .validation_error(
                    &format!("You cannot request {requested} aliases right now."),
                    &format!("Choose a number between 1 and {max}."),
                )
                .await?;
        }
        Err(RequestError::QuotaExhausted) => {
            log_command_success(&actor, "quota exhausted");
            feedback.warning("Your daily alias quota is used up. Come back tomorrow!").await?;
        }
        Err(RequestError::Storage(e)) => {
            log_command_error(&actor, &e.to_string());
            feedback.retry_later().await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::{AliasCandidate, AliasKind};

    fn batch(folding_domain: bool, domain: &str) -> AliasBatch {
        AliasBatch {
            aliases: vec![
                AliasCandidate {
                    local_variant: "johndoe+251019a1".to_string(),
                    domain: domain.to_string(),
                    kind: AliasKind::Tagged("251019a1".to_string()),
                },
                AliasCandidate {
                    local_variant: "jo.hn.do.e".to_string(),
                    domain: domain.to_string(),
                    kind: AliasKind::Dotted,
                },
            ],
            remaining: 6,
            folding_domain,
        }
    }

    #[test]
    fn test_render_batch_lists_aliases_verbatim() {
        let text = render_batch(&batch(true, "gmail.com"), 2, 10);
        assert!(text.contains("```\njohndoe+251019a1@gmail.com\njo.hn.do.e@gmail.com\n```"));
        assert!(text.contains("Remaining today: 6 of 10"));
        assert!(!text.contains("not a Gmail domain"));
        assert!(!text.contains("Only"));
    }

    #[test]
    fn test_render_batch_warns_for_other_domains() {
        let text = render_batch(&batch(false, "example.com"), 2, 10);
        assert!(text.contains("example\\.com is not a Gmail domain"));
    }

    #[test]
    fn test_render_batch_mentions_partial_delivery() {
        let text = render_batch(&batch(true, "gmail.com"), 5, 10);
        assert!(text.contains("Only 2 of the 5 requested aliases"));
    }

    #[test]
    fn test_is_aliases_command() {
        assert!(is_aliases_command("/aliases"));
        assert!(is_aliases_command("/aliases john@gmail.com"));
        assert!(is_aliases_command("/aliases@testbot a b c"));
        assert!(is_aliases_command("  /ALIASES x"));
        assert!(!is_aliases_command("/quota"));
        assert!(!is_aliases_command("/aliasesx john@gmail.com 3"));
        assert!(!is_aliases_command("aliases john@gmail.com 3"));
        assert!(!is_aliases_command(""));
    }

    #[test]
    fn test_usage_hint_shows_current_range() {
        let hint = usage_hint(4);
        assert!(hint.starts_with("Usage: /aliases <email> <count>"));
        assert!(hint.contains("between 1 and 4"));
        assert!(usage_hint(0).contains("used up"));
    }

    #[test]
    fn test_invalid_address_message() {
        assert_eq!(
            invalid_address_message(InvalidReason::Shape),
            "Invalid email address: address must look like name@example.com"
        );
    }
}
