//! Bot module for handling Telegram interactions
//!
//! - `message_handler`: entry point for every incoming message
//! - `command_handlers`: one handler per slash command
//! - `ui_builder`: renders tracker results as plain-text replies

pub mod command_handlers;
pub mod message_handler;
pub mod ui_builder;

use std::sync::Arc;

use parking_lot::Mutex;
use teloxide::Bot;

use crate::config::ScheduleConfig;
use crate::localization::LocalizationManager;
use crate::tracker::NutritionTracker;

/// Shared state handed to every handler and scheduled job.
///
/// The tracker sits behind a single mutex so ledger mutations are serialized.
/// Guards must be released before awaiting on Telegram.
#[derive(Clone)]
pub struct BotState {
    pub tracker: Arc<Mutex<NutritionTracker>>,
    pub localization: Arc<LocalizationManager>,
    pub schedule: ScheduleConfig,
}

impl BotState {
    pub fn new(
        tracker: NutritionTracker,
        localization: Arc<LocalizationManager>,
        schedule: ScheduleConfig,
    ) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(tracker)),
            localization,
            schedule,
        }
    }
}

/// Common context for bot handlers containing shared dependencies
pub struct HandlerContext<'a> {
    pub bot: &'a Bot,
    pub state: &'a BotState,
    pub language_code: Option<&'a str>,
}

pub use message_handler::message_handler;
