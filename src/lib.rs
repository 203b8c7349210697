//! # Nutrition Ledger Telegram Bot
//!
//! A Telegram bot that turns short free-text food messages ("200g rice,
//! 3 eggs") into a daily nutrition ledger tracked against fixed macro goals,
//! with scheduled check-ins and a rolling retention window.

pub mod bot;
pub mod catalog;
pub mod config;
pub mod entry_parser;
pub mod errors;
pub mod goals;
pub mod ledger;
pub mod localization;
pub mod nutrition;
pub mod observability;
pub mod observability_config;
pub mod quick_add;
pub mod scheduler;
pub mod tracker;

// Re-export types for easier access
pub use catalog::{FoodCatalog, InMemoryCatalog};
pub use entry_parser::{EntryParser, MacroResolution, ParsedDeclaration, ParserConfig};
pub use errors::{AppError, AppResult, LedgerError, QuickAddError};
pub use goals::Goals;
pub use ledger::{DayRecord, Entry, Ledger, NewEntry};
pub use nutrition::{FoodMacros, MacroKind};
pub use quick_add::{parse_quick_add, QuickAdd};
pub use tracker::NutritionTracker;
