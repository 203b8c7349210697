use anyhow::Result;
use nutrition_ledger::bot::{self, BotState};
use nutrition_ledger::catalog::load_food_catalog;
use nutrition_ledger::config::AppConfig;
use nutrition_ledger::entry_parser::EntryParser;
use nutrition_ledger::errors::error_logging;
use nutrition_ledger::ledger::Ledger;
use nutrition_ledger::observability_config::ObservabilityConfig;
use nutrition_ledger::tracker::NutritionTracker;
use nutrition_ledger::{localization, observability, scheduler};
use std::time::Duration;
use teloxide::prelude::*;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    // Logging comes up before the rest of the configuration so its errors are recorded
    observability::init_observability(&ObservabilityConfig::from_env())?;

    let config = AppConfig::from_env().inspect_err(|e| {
        error_logging::log_config_error(e, "environment", "load_config");
    })?;

    config.validate().inspect_err(|e| {
        error_logging::log_config_error(e, "app_config", "validate_config");
    })?;
    info!("{}", config.summary());

    let catalog = load_food_catalog()?;
    info!(foods = catalog.len(), "Food catalog ready");

    let tracker = NutritionTracker::new(
        EntryParser::with_config(config.parser.clone()),
        catalog,
        Ledger::new(config.ledger.timezone),
        config.goals,
        config.ledger.retention_days,
    );

    let localization_manager = localization::create_localization_manager()?;
    let state = BotState::new(tracker, localization_manager, config.schedule.clone());

    // Initialize the bot with custom client configuration for better reliability
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.bot.http_timeout_secs))
        .build()?;

    let bot = Bot::with_client(config.bot.token.clone(), client);

    let _scheduler_handles = scheduler::start_scheduler(
        bot.clone(),
        state.clone(),
        config.schedule.clone(),
        config.bot.chat_id,
        config.bot.reminder_language.clone(),
    );

    info!(
        timeout_secs = config.bot.http_timeout_secs,
        "Bot initialized, starting dispatcher"
    );

    let handler = dptree::entry().branch(Update::filter_message().endpoint({
        let state = state.clone();
        move |bot: Bot, msg: Message| {
            let state = state.clone();
            async move { bot::message_handler(bot, msg, state).await }
        }
    }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
