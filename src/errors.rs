//! # Application Error Types
//!
//! This module defines the error types used throughout the nutrition ledger.
//! Every core error is recoverable: callers report it to the user and carry on.

use chrono::NaiveDate;
use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Validation errors (user inputs, catalog entries, etc.)
    Validation(String),
    /// Text that could not be understood by any input grammar
    Parse(String),
    /// Ledger state errors (undo on an empty day, ...)
    Ledger(String),
    /// Food catalog loading errors
    Catalog(String),
    /// Network/communication errors
    Network(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Validation(msg) => write!(f, "[VALIDATION] {}", msg),
            AppError::Parse(msg) => write!(f, "[PARSE] {}", msg),
            AppError::Ledger(msg) => write!(f, "[LEDGER] {}", msg),
            AppError::Catalog(msg) => write!(f, "[CATALOG] {}", msg),
            AppError::Network(msg) => write!(f, "[NETWORK] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        AppError::Ledger(err.to_string())
    }
}

impl From<QuickAddError> for AppError {
    fn from(err: QuickAddError) -> Self {
        AppError::Parse(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Errors raised by ledger mutations
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// Undo was requested on a day that has no entries
    EmptyLedger { date: NaiveDate },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::EmptyLedger { date } => {
                write!(f, "[EMPTY_LEDGER] No entry to undo on {}", date)
            }
        }
    }
}

impl std::error::Error for LedgerError {}

/// Errors raised by the quick-add and catalog-extension grammars
#[derive(Debug, Clone, PartialEq)]
pub enum QuickAddError {
    /// The text matches neither quick-add form
    UnrecognizedFormat(String),
    /// A `name|kcal|protein|fat|carb` line with the wrong number of fields
    WrongFieldCount { expected: usize, found: usize },
    /// A macro field that is not a number
    NonNumeric { field: &'static str, value: String },
    /// A macro field that is negative or not finite
    Negative { field: &'static str, value: f64 },
    /// A catalog extension without a food name
    EmptyName,
}

impl fmt::Display for QuickAddError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuickAddError::UnrecognizedFormat(text) => {
                write!(f, "[QUICK_ADD] Unrecognized quick-add format: '{}'", text)
            }
            QuickAddError::WrongFieldCount { expected, found } => write!(
                f,
                "[QUICK_ADD] Expected {} '|'-separated fields, found {}",
                expected, found
            ),
            QuickAddError::NonNumeric { field, value } => {
                write!(f, "[QUICK_ADD] Field '{}' is not a number: '{}'", field, value)
            }
            QuickAddError::Negative { field, value } => write!(
                f,
                "[QUICK_ADD] Field '{}' must be a non-negative number, got {}",
                field, value
            ),
            QuickAddError::EmptyName => write!(f, "[QUICK_ADD] Food name cannot be empty"),
        }
    }
}

impl std::error::Error for QuickAddError {}

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::error;

    /// Log transport errors with chat context
    pub fn log_telegram_error(error: &impl std::fmt::Display, operation: &str, chat_id: Option<i64>) {
        error!(
            error = %error,
            operation = %operation,
            chat_id = ?chat_id,
            "Telegram operation failed"
        );
    }

    /// Log validation errors with input context
    pub fn log_validation_error(
        error: &impl std::fmt::Display,
        operation: &str,
        input_type: &str,
        input_value: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            input_type = %input_type,
            input_value = ?input_value.map(|v| if v.chars().count() > 100 {
                format!("{}...", v.chars().take(100).collect::<String>())
            } else {
                v.to_string()
            }),
            "Validation failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}
