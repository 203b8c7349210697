//! # Observability Configuration
//!
//! Environment-specific settings for logging and metrics export.

use std::env;

/// Observability configuration for different environments
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Environment name (development, staging, production)
    pub environment: String,
    /// Log level for the crate's own targets
    pub log_level: String,
    /// Log output format: "pretty" or "json"
    pub log_format: String,
    /// Prometheus metrics endpoint port
    pub metrics_port: u16,
    /// Whether to serve metrics for an external Prometheus
    pub enable_metrics_export: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            log_format: "json".to_string(),
            metrics_port: 9090,
            enable_metrics_export: false,
        }
    }
}

impl ObservabilityConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
            metrics_port: env::var("METRICS_PORT")
                .unwrap_or_else(|_| "9090".to_string())
                .parse()
                .unwrap_or(9090),
            enable_metrics_export: env::var("ENABLE_METRICS_EXPORT")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        }
    }

    /// Check if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Pretty logs in development or when explicitly asked for
    pub fn use_pretty_logs(&self) -> bool {
        self.is_development() || self.log_format == "pretty"
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!("Invalid log level: {}", self.log_level));
        }

        if self.log_format != "pretty" && self.log_format != "json" {
            return Err(format!("Invalid log format: {}", self.log_format));
        }

        if self.enable_metrics_export && self.metrics_port < 1024 {
            return Err(format!(
                "Metrics port {} is privileged, use a port >= 1024",
                self.metrics_port
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ObservabilityConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.is_development());
        assert!(config.use_pretty_logs());
    }

    #[test]
    fn test_invalid_values() {
        let mut config = ObservabilityConfig {
            log_level: "verbose".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.log_level = "debug".to_string();
        config.log_format = "xml".to_string();
        assert!(config.validate().is_err());

        config.log_format = "json".to_string();
        config.enable_metrics_export = true;
        config.metrics_port = 80;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_uses_json_logs() {
        let config = ObservabilityConfig {
            environment: "production".to_string(),
            ..Default::default()
        };
        assert!(!config.is_development());
        assert!(!config.use_pretty_logs());
    }

    #[test]
    fn test_from_env_is_independent_of_bot_settings() {
        // Read before the bot token is validated, so it must never fail
        let config = ObservabilityConfig::from_env();
        assert!(config.metrics_port > 0);
        assert!(!config.environment.is_empty());
    }
}
