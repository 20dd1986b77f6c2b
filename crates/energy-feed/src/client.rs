// ABOUTME: Guarded health feed client: authorization gate, per-call timeout, circuit breaker
// ABOUTME: Fetches resting energy, active energy and weight together as one reading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use crate::source::{FeedChange, HealthFeed};
use chrono::NaiveDate;
use energy_core::{FeedError, FeedResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// One day's raw values from the feed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedReading {
    /// Resting energy (kcal)
    pub resting_energy_kcal: f64,
    /// Active energy (kcal)
    pub active_energy_kcal: f64,
    /// Most recent weight (kg)
    pub weight_kg: Option<f64>,
}

/// Health feed wrapped with the authorization gate, timeout and circuit breaker
pub struct FeedClient {
    feed: Arc<dyn HealthFeed>,
    breaker: CircuitBreaker,
    timeout: Duration,
    authorized: AtomicBool,
}

impl FeedClient {
    /// Wrap a feed
    #[must_use]
    pub fn new(feed: Arc<dyn HealthFeed>, timeout: Duration, breaker: CircuitBreakerConfig) -> Self {
        let breaker = CircuitBreaker::with_config(feed.name(), breaker);
        Self {
            feed,
            breaker,
            timeout,
            authorized: AtomicBool::new(false),
        }
    }

    /// Name of the wrapped feed
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.feed.name()
    }

    /// Current circuit breaker state
    #[must_use]
    pub fn circuit_state(&self) -> CircuitState {
        self.breaker.state()
    }

    /// Subscribe to the wrapped feed's change notifications
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FeedChange> {
        self.feed.subscribe()
    }

    /// Request authorization unless it already succeeded
    ///
    /// # Errors
    ///
    /// Returns the feed's authorization error, or `FeedError::Timeout`
    pub async fn ensure_authorized(&self) -> FeedResult<()> {
        if self.authorized.load(Ordering::SeqCst) {
            return Ok(());
        }

        tokio::time::timeout(self.timeout, self.feed.request_authorization())
            .await
            .map_err(|_| self.timeout_error("request_authorization"))??;

        self.authorized.store(true, Ordering::SeqCst);
        info!(feed = self.feed.name(), "Health feed authorization granted");
        Ok(())
    }

    /// Fetch resting energy, active energy and weight for `date`
    ///
    /// The three queries run concurrently under a single timeout. Any failure fails
    /// the whole reading.
    ///
    /// # Errors
    ///
    /// Returns `FeedError` on authorization failure, timeout, open circuit, feed
    /// failure, or implausible values
    pub async fn fetch_reading(&self, date: NaiveDate) -> FeedResult<FeedReading> {
        self.ensure_authorized().await?;

        let reading = self
            .breaker
            .call(async {
                let queries = async {
                    tokio::try_join!(
                        self.feed.fetch_resting_energy(date),
                        self.feed.fetch_active_energy(date),
                        self.feed.fetch_weight(),
                    )
                };
                let (resting, active, weight) = tokio::time::timeout(self.timeout, queries)
                    .await
                    .map_err(|_| self.timeout_error("fetch_reading"))??;
                Ok::<_, FeedError>(FeedReading {
                    resting_energy_kcal: resting,
                    active_energy_kcal: active,
                    weight_kg: weight,
                })
            })
            .await
            .inspect_err(|error| {
                if error.is_authorization() {
                    self.authorized.store(false, Ordering::SeqCst);
                }
            })?;

        validate_reading(&reading)?;
        debug!(
            feed = self.feed.name(),
            %date,
            resting = reading.resting_energy_kcal,
            active = reading.active_energy_kcal,
            "Fetched feed reading"
        );
        Ok(reading)
    }

    fn timeout_error(&self, operation: &str) -> FeedError {
        FeedError::Timeout {
            operation: operation.to_owned(),
            timeout_ms: self.timeout.as_millis() as u64,
        }
    }
}

fn validate_reading(reading: &FeedReading) -> FeedResult<()> {
    let checks = [
        ("resting_energy", Some(reading.resting_energy_kcal)),
        ("active_energy", Some(reading.active_energy_kcal)),
        ("weight", reading.weight_kg),
    ];
    for (field, value) in checks {
        if let Some(value) = value {
            if !value.is_finite() || value < 0.0 {
                return Err(FeedError::InvalidData {
                    field: field.to_owned(),
                    reason: format!("{value} is not a non-negative number"),
                });
            }
        }
    }
    Ok(())
}
