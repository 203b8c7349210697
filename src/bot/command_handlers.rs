//! Command Handlers module for processing bot commands
//!
//! Replies are built synchronously while the tracker lock is held, then sent.

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{debug, info};

use super::ui_builder::{
    format_add_usage, format_food_list, format_help, format_history, format_quick_add,
    format_quick_add_error, format_search_results, format_status, format_undo, format_welcome,
};
use super::{BotState, HandlerContext};
use crate::errors::error_logging;
use crate::localization::t_lang;

/// Days shown by `/history`, today included
pub const HISTORY_DAYS: u64 = 3;

/// Maximum number of foods listed by `/search`
pub const SEARCH_RESULT_LIMIT: usize = 8;

/// A recognized slash command and its argument text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand<'a> {
    Start,
    Help,
    Status,
    History,
    Undo,
    Add(&'a str),
    Search(&'a str),
    List,
}

impl<'a> BotCommand<'a> {
    /// Parse `/command[@bot] [args]`; `None` for plain text or unknown commands
    pub fn parse(text: &'a str) -> Option<Self> {
        let text = text.trim();
        let rest = text.strip_prefix('/')?;

        let (head, args) = match rest.find(char::is_whitespace) {
            Some(index) => (&rest[..index], rest[index..].trim()),
            None => (rest, ""),
        };
        // Group chats append the bot's username: /status@my_bot
        let name = head.split('@').next().unwrap_or(head);

        match name.to_lowercase().as_str() {
            "start" => Some(BotCommand::Start),
            "help" => Some(BotCommand::Help),
            "status" => Some(BotCommand::Status),
            "history" => Some(BotCommand::History),
            "undo" => Some(BotCommand::Undo),
            "add" => Some(BotCommand::Add(args)),
            "search" => Some(BotCommand::Search(args)),
            "list" => Some(BotCommand::List),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BotCommand::Start => "start",
            BotCommand::Help => "help",
            BotCommand::Status => "status",
            BotCommand::History => "history",
            BotCommand::Undo => "undo",
            BotCommand::Add(_) => "add",
            BotCommand::Search(_) => "search",
            BotCommand::List => "list",
        }
    }
}

/// Build the reply for a command, applying any ledger or catalog change
pub fn command_reply(state: &BotState, command: BotCommand<'_>, language_code: Option<&str>) -> String {
    let localization = state.localization.as_ref();
    let mut tracker = state.tracker.lock();
    let today = tracker.today();
    let goals = *tracker.goals();

    match command {
        BotCommand::Start => format_welcome(&goals, localization, language_code),
        BotCommand::Help => format_help(&state.schedule, localization, language_code),
        BotCommand::Status => {
            let snapshot = tracker.status(today);
            format_status(&snapshot.totals, &goals, localization, language_code)
        }
        BotCommand::History => {
            let days = tracker.history(today, HISTORY_DAYS);
            format_history(&days, today, &goals, localization, language_code)
        }
        BotCommand::Undo => match tracker.undo(today) {
            Ok((entry, remaining)) => {
                info!(food = %entry.food_name, grams = entry.grams, "Entry undone");
                format_undo(&entry, &remaining, localization, language_code)
            }
            Err(e) => {
                debug!(error = %e, "Undo requested on an empty day");
                t_lang(localization, "undo-empty", language_code)
            }
        },
        BotCommand::Add("") => format_add_usage(localization, language_code),
        BotCommand::Add(args) => match tracker.quick_add(today, args) {
            Ok(outcome) => format_quick_add(&outcome, &goals, localization, language_code),
            Err(e) => {
                error_logging::log_validation_error(&e, "quick_add", "quick_add_text", Some(args));
                format_quick_add_error(&e, localization, language_code)
            }
        },
        BotCommand::Search("") => t_lang(localization, "search-usage", language_code),
        BotCommand::Search(query) => {
            let results = tracker.search(query, SEARCH_RESULT_LIMIT);
            format_search_results(query, &results, localization, language_code)
        }
        BotCommand::List => {
            let catalog = tracker.catalog();
            format_food_list(&catalog.names(), localization, language_code)
        }
    }
}

/// Run a command and send its reply to the chat it came from
pub async fn handle_command(
    ctx: &HandlerContext<'_>,
    msg: &Message,
    command: BotCommand<'_>,
) -> Result<()> {
    debug!(user_id = %msg.chat.id, command = command.name(), "Handling command");

    let reply = command_reply(ctx.state, command, ctx.language_code);
    ctx.bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}
