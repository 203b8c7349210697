//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{debug, Instrument};

use super::command_handlers::{handle_command, BotCommand};
use super::ui_builder::format_log_outcome;
use super::{BotState, HandlerContext};
use crate::localization::t_lang;
use crate::observability;

/// Reply for a free-text food message; the day is today in the ledger's timezone
pub fn food_message_reply(state: &BotState, text: &str, language_code: Option<&str>) -> String {
    let mut tracker = state.tracker.lock();
    let today = tracker.today();
    let outcome = tracker.log_text(today, text);
    let goals = *tracker.goals();
    drop(tracker);

    format_log_outcome(&outcome, &goals, &state.localization, language_code)
}

async fn handle_text_message(ctx: &HandlerContext<'_>, msg: &Message, text: &str) -> Result<()> {
    if let Some(command) = BotCommand::parse(text) {
        return handle_command(ctx, msg, command).await;
    }

    if text.trim_start().starts_with('/') {
        debug!(user_id = %msg.chat.id, "Ignoring unknown command");
        ctx.bot
            .send_message(
                msg.chat.id,
                t_lang(&ctx.state.localization, "unknown-command", ctx.language_code),
            )
            .await?;
        return Ok(());
    }

    debug!(user_id = %msg.chat.id, "Received food message");
    let reply = food_message_reply(ctx.state, text, ctx.language_code);
    ctx.bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn handle_unsupported_message(ctx: &HandlerContext<'_>, msg: &Message) -> Result<()> {
    debug!(user_id = %msg.chat.id, "Received unsupported message type from user");
    ctx.bot
        .send_message(
            msg.chat.id,
            t_lang(&ctx.state.localization, "log-not-understood", ctx.language_code),
        )
        .await?;
    Ok(())
}

pub async fn message_handler(bot: Bot, msg: Message, state: BotState) -> Result<()> {
    let span = observability::telegram_span(
        "message_handler",
        msg.from.as_ref().map(|u| u.id.0 as i64),
    );

    async move {
        let start_time = std::time::Instant::now();

        let language_code = msg
            .from
            .as_ref()
            .and_then(|user| user.language_code.as_deref());
        let ctx = HandlerContext {
            bot: &bot,
            state: &state,
            language_code,
        };

        let (message_type, result) = match msg.text() {
            Some(text) if BotCommand::parse(text).is_some() => {
                ("command", handle_text_message(&ctx, &msg, text).await)
            }
            Some(text) => ("text", handle_text_message(&ctx, &msg, text).await),
            None => ("unsupported", handle_unsupported_message(&ctx, &msg).await),
        };

        if let Err(e) = &result {
            crate::errors::error_logging::log_telegram_error(
                e,
                message_type,
                Some(msg.chat.id.0),
            );
        }

        observability::record_telegram_message(message_type, start_time.elapsed());
        result
    }
    .instrument(span)
    .await
}
