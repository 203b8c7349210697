//! Observability module for centralized logging and metrics setup.
//!
//! This module provides:
//! - Structured logging with configurable levels and formats
//! - Metrics collection with optional Prometheus export
//! - Span helpers for ledger and Telegram operations

use std::net::SocketAddr;

use anyhow::Result;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::prelude::*;

use crate::observability_config::ObservabilityConfig;

/// Initialize logging and metrics
pub fn init_observability(config: &ObservabilityConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    init_tracing_with_config(config)?;

    if config.enable_metrics_export {
        init_metrics_with_config(config)?;
    }

    tracing::info!(
        environment = %config.environment,
        metrics_port = %config.metrics_port,
        metrics_export = config.enable_metrics_export,
        "Observability stack initialized successfully"
    );
    Ok(())
}

/// Initialize structured logging with tracing and configuration
fn init_tracing_with_config(config: &ObservabilityConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("nutrition_ledger={}", config.log_level).parse()?)
        .add_directive("teloxide=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    if config.use_pretty_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Install the Prometheus recorder and its HTTP listener
fn init_metrics_with_config(config: &ObservabilityConfig) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    tracing::info!("Metrics exporter listening on {}", addr);
    Ok(())
}

/// Create a span for ledger operations
pub fn ledger_span(operation: &str, date: NaiveDate) -> tracing::Span {
    tracing::info_span!(
        "ledger_operation",
        operation = operation,
        date = %date,
        component = "ledger"
    )
}

/// Create a span for Telegram bot operations
pub fn telegram_span(operation: &str, user_id: Option<i64>) -> tracing::Span {
    tracing::info_span!(
        "telegram_operation",
        operation = operation,
        user_id = user_id,
        component = "telegram"
    )
}

/// Count one parsed message segment by outcome (resolved, unresolved, unparseable)
pub fn record_segment_outcome(outcome: &'static str) {
    metrics::counter!("entry_segments_total", "outcome" => outcome).increment(1);
}

/// Count one ledger mutation
pub fn record_ledger_operation(operation: &'static str) {
    metrics::counter!("ledger_operations_total", "operation" => operation).increment(1);
}

/// Record an incoming Telegram message and its handling time
pub fn record_telegram_message(message_type: &'static str, duration: std::time::Duration) {
    metrics::counter!("telegram_messages_total", "type" => message_type).increment(1);
    metrics::histogram!("message_duration_seconds").record(duration.as_secs_f64());
}

/// Count a scheduled job run
pub fn record_scheduled_job(job: &'static str) {
    metrics::counter!("scheduled_jobs_total", "job" => job).increment(1);
}
