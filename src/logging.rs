// ABOUTME: Logging configuration and structured logging setup for the energy balance engine
// ABOUTME: Configures log levels and formatters, plus helpers for the engine's structured events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging configuration

use anyhow::Result;
use chrono::NaiveDate;
use energy_core::models::{Goal, SyncStatus, SyncTrigger};
use energy_core::{FeedError, StorageError};
use serde_json::json;
use std::env;
use std::io;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const SERVICE_NAME: &str = "energy-balance";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Multi-line human readable
    Pretty,
    /// Single-line human readable
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            service_name: SERVICE_NAME.into(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| SERVICE_NAME.into()),
            environment,
        }
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let env_filter = EnvFilter::new(&self.level).add_directive(
            format!("energy_balance={}", self.level)
                .parse()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        );

        let registry = tracing_subscriber::registry().with(env_filter);

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(FmtSpan::NONE)
                    .json();
                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout);
                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_file(false)
                    .with_line_number(false)
                    .with_target(false)
                    .with_writer(io::stdout);
                registry.with(compact_layer).try_init()?;
            }
        }

        self.log_startup_info();
        Ok(())
    }

    fn log_startup_info(&self) {
        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": env!("CARGO_PKG_VERSION"),
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
                "location": self.include_location
            }
        });
        info!(
            service.name = %self.service_name,
            environment = %self.environment,
            "Energy balance engine starting up: {config_summary}"
        );
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Structured events emitted by the engine
pub struct EngineLogger;

impl EngineLogger {
    /// Log a sync status transition
    pub fn log_sync_transition(trigger: SyncTrigger, status: &SyncStatus) {
        match status {
            SyncStatus::Failed(failure) => warn!(
                sync.trigger = trigger.as_str(),
                sync.status = status.as_str(),
                error.code = ?failure.code,
                error.message = %failure.message,
                "Sync failed"
            ),
            _ => info!(
                sync.trigger = trigger.as_str(),
                sync.status = status.as_str(),
                "Sync status changed"
            ),
        }
    }

    /// Log a feed failure replaced by calculated values
    pub fn log_feed_fallback(feed: &str, date: NaiveDate, error: &FeedError) {
        warn!(
            feed.name = %feed,
            %date,
            error = %error,
            "Health feed unavailable, using calculated energy"
        );
    }

    /// Log a persisted goal
    pub fn log_goal_saved(goal: &Goal) {
        info!(
            goal.id = %goal.id,
            goal.goal_type = goal.goal_type.as_str(),
            goal.calories = goal.daily_calorie_target,
            goal.protein_g = goal.daily_protein_target_g,
            goal.water_ml = goal.daily_water_target_ml,
            "Goal saved"
        );
    }

    /// Log a goal edit that failed validation or persistence
    pub fn log_goal_rejected(reason: &str) {
        warn!(goal.reason = %reason, "Goal edit rejected");
    }

    /// Log a persistence failure
    pub fn log_storage_failure(operation: &str, error: &StorageError) {
        warn!(
            storage.operation = %operation,
            error = %error,
            "Storage operation failed"
        );
    }
}
