//! # Unified Application Configuration
//!
//! This module consolidates all application settings into a single, structured
//! configuration object loaded from environment variables, with validation and
//! a redacted summary for startup logs.

use crate::entry_parser::ParserConfig;
use crate::errors::{AppError, AppResult};
use crate::goals::Goals;
use crate::ledger::DEFAULT_RETENTION_DAYS;
use crate::observability_config::ObservabilityConfig;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Read an environment variable, falling back to `default` when unset
fn env_or<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a valid value, got '{}'", key, value))),
        Err(_) => Ok(default),
    }
}

/// Bot-specific configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Telegram bot token
    pub token: String,
    /// Chat receiving scheduled reminders
    pub chat_id: Option<i64>,
    /// HTTP client timeout in seconds
    pub http_timeout_secs: u64,
    /// Language of scheduled reminders ("en", "fr")
    pub reminder_language: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            chat_id: None,
            http_timeout_secs: 30,
            reminder_language: None,
        }
    }
}

impl BotConfig {
    /// Validate bot configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.token.trim().is_empty() {
            return Err(AppError::Config("Bot token cannot be empty".to_string()));
        }

        let parts: Vec<&str> = self.token.split(':').collect();
        if parts.len() != 2 {
            return Err(AppError::Config(
                "Bot token format is invalid. Expected format: 'bot_id:bot_token'".to_string(),
            ));
        }

        if parts[0].parse::<u64>().is_err() {
            return Err(AppError::Config(
                "Bot token bot ID must be numeric".to_string(),
            ));
        }

        if parts[1].len() < 20 {
            return Err(AppError::Config(
                "Bot token appears to be too short. Please verify it's a valid token".to_string(),
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(AppError::Config("HTTP timeout cannot be 0".to_string()));
        }

        if self.http_timeout_secs > 300 {
            return Err(AppError::Config(
                "HTTP timeout cannot be greater than 300 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

/// Day boundaries and retention
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    pub timezone: Tz,
    /// Days kept before the current one
    pub retention_days: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::Paris,
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.retention_days > 365 {
            return Err(AppError::Config(
                "Retention cannot be greater than 365 days".to_string(),
            ));
        }
        Ok(())
    }
}

/// Local times of the scheduled jobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub midday_hour: u32,
    pub evening_hour: u32,
    pub recap_hour: u32,
    pub prune_hour: u32,
    pub prune_minute: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            midday_hour: 12,
            evening_hour: 18,
            recap_hour: 23,
            prune_hour: 0,
            prune_minute: 1,
        }
    }
}

impl ScheduleConfig {
    pub fn validate(&self) -> AppResult<()> {
        for (name, hour) in [
            ("midday_hour", self.midday_hour),
            ("evening_hour", self.evening_hour),
            ("recap_hour", self.recap_hour),
            ("prune_hour", self.prune_hour),
        ] {
            if hour > 23 {
                return Err(AppError::Config(format!(
                    "{} must be between 0 and 23, got {}",
                    name, hour
                )));
            }
        }

        if self.prune_minute > 59 {
            return Err(AppError::Config(format!(
                "prune_minute must be between 0 and 59, got {}",
                self.prune_minute
            )));
        }

        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub bot: BotConfig,
    pub ledger: LedgerConfig,
    pub goals: Goals,
    pub parser: ParserConfig,
    pub schedule: ScheduleConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        config.bot.token = env::var("TELEGRAM_BOT_TOKEN").map_err(|_| {
            AppError::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
        })?;
        config.bot.chat_id = match env::var("CHAT_ID") {
            Ok(value) if !value.trim().is_empty() => Some(value.trim().parse().map_err(|_| {
                AppError::Config("CHAT_ID must be a numeric Telegram chat id".to_string())
            })?),
            _ => None,
        };
        config.bot.http_timeout_secs = env_or("HTTP_CLIENT_TIMEOUT_SECS", 30)?;
        config.bot.reminder_language = env::var("REMINDER_LANGUAGE")
            .ok()
            .filter(|language| !language.trim().is_empty());

        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| "Europe/Paris".to_string());
        config.ledger.timezone = timezone
            .parse::<Tz>()
            .map_err(|_| AppError::Config(format!("TIMEZONE '{}' is not a known timezone", timezone)))?;
        config.ledger.retention_days = env_or("RETENTION_DAYS", DEFAULT_RETENTION_DAYS)?;

        let defaults = Goals::default();
        config.goals = Goals::new(
            env_or("GOAL_KCAL", defaults.targets.kcal)?,
            env_or("GOAL_PROTEIN", defaults.targets.protein)?,
            env_or("GOAL_FAT", defaults.targets.fat)?,
            env_or("GOAL_CARB", defaults.targets.carb)?,
        );

        config.parser.bare_count_threshold =
            env_or("BARE_COUNT_THRESHOLD", config.parser.bare_count_threshold)?;

        config.observability = ObservabilityConfig::from_env();

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.bot.validate()?;
        self.ledger.validate()?;
        self.goals.validate()?;
        self.parser.validate()?;
        self.schedule.validate()?;
        self.observability.validate().map_err(AppError::Config)?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: bot_token=[REDACTED], chat_id={}, timezone={}, retention_days={}, goals={:.0}kcal/{:.0}p/{:.0}l/{:.0}g, environment={}",
            self.bot
                .chat_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "unset".to_string()),
            self.ledger.timezone,
            self.ledger.retention_days,
            self.goals.targets.kcal,
            self.goals.targets.protein,
            self.goals.targets.fat,
            self.goals.targets.carb,
            self.observability.environment
        )
    }
}
