// ABOUTME: Energy source arbiter producing one authoritative energy sample per day
// ABOUTME: Prefers the external feed wholesale, otherwise falls back to calculated values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Energy Source Arbiter
//!
//! Priority is all-or-nothing per sample. A feed reading with non-zero resting
//! energy is used for resting, active and weight together; anything else yields a
//! fully calculated sample:
//!
//! - resting energy from the profile via Mifflin-St Jeor
//! - active energy as a fixed share of resting energy
//! - weight from the profile
//!
//! Feed failures never fail a resolution. They are logged and returned alongside
//! the fallback sample so a manual refresh can surface them, and
//! [`EnergySourceArbiter::resolve_strict`] reports them even when the fallback fails too.

use crate::intelligence::TargetCalculator;
use crate::logging::EngineLogger;
use crate::persistence::EnergyStore;
use chrono::NaiveDate;
use energy_core::models::{EnergySample, EnergySource};
use energy_core::{BalanceError, BalanceResult, FeedError};
use energy_feed::FeedClient;
use std::sync::Arc;
use tracing::debug;

/// A resolved sample plus the feed failure that forced a fallback, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The sample to use
    pub sample: EnergySample,
    /// Feed failure replaced by the calculated path
    pub feed_error: Option<FeedError>,
}

/// Resolves daily energy samples from the feed or the calculator
pub struct EnergySourceArbiter {
    feed: Option<FeedClient>,
    store: Arc<dyn EnergyStore>,
    calculator: TargetCalculator,
}

impl EnergySourceArbiter {
    /// Arbiter over an optional feed; without one every sample is calculated
    #[must_use]
    pub fn new(
        feed: Option<FeedClient>,
        store: Arc<dyn EnergyStore>,
        calculator: TargetCalculator,
    ) -> Self {
        Self {
            feed,
            store,
            calculator,
        }
    }

    /// The guarded feed client, if a feed is configured
    #[must_use]
    pub const fn feed(&self) -> Option<&FeedClient> {
        self.feed.as_ref()
    }

    /// Resolve the sample for `date`
    ///
    /// # Errors
    ///
    /// Feed failures are never returned here. Errors come only from the fallback
    /// path: `UserNotFound` when no profile exists, `InvalidBodyMetric` for an
    /// out-of-range profile, or `StorageFailure` when the profile can't be read.
    pub async fn resolve(&self, date: NaiveDate) -> BalanceResult<Resolution> {
        let (sample, feed_error) = self.resolve_parts(date).await;
        Ok(Resolution {
            sample: sample?,
            feed_error,
        })
    }

    /// Like [`Self::resolve`], but a feed failure wins over a fallback failure
    ///
    /// # Errors
    ///
    /// Returns `ExternalFeedFailure` when the feed failed and no calculated sample
    /// could be produced, otherwise the errors of [`Self::resolve`]
    pub async fn resolve_strict(&self, date: NaiveDate) -> BalanceResult<Resolution> {
        match self.resolve_parts(date).await {
            (Ok(sample), feed_error) => Ok(Resolution { sample, feed_error }),
            (Err(fallback), Some(feed_error)) => {
                debug!(%date, error = %fallback, "Calculated energy unavailable after feed failure");
                Err(BalanceError::ExternalFeedFailure(feed_error))
            }
            (Err(fallback), None) => Err(fallback),
        }
    }

    async fn resolve_parts(&self, date: NaiveDate) -> (BalanceResult<EnergySample>, Option<FeedError>) {
        let feed_error = match self.feed.as_ref() {
            Some(feed) => match feed.fetch_reading(date).await {
                Ok(reading) if reading.resting_energy_kcal > 0.0 => {
                    let sample = EnergySample {
                        date,
                        resting_energy_kcal: reading.resting_energy_kcal,
                        active_energy_kcal: reading.active_energy_kcal,
                        weight_kg: reading.weight_kg,
                        source: EnergySource::External,
                    };
                    return (Ok(sample), None);
                }
                Ok(_) => {
                    debug!(feed = feed.name(), %date, "Feed has no resting energy, using calculated energy");
                    None
                }
                Err(error) => {
                    EngineLogger::log_feed_fallback(feed.name(), date, &error);
                    Some(error)
                }
            },
            None => None,
        };

        (self.calculated_sample(date).await, feed_error)
    }

    /// Resolve and discard any feed failure
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`]
    pub async fn sample_for(&self, date: NaiveDate) -> BalanceResult<EnergySample> {
        Ok(self.resolve(date).await?.sample)
    }

    /// Fully calculated sample from the stored profile
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound`, `InvalidBodyMetric` or `StorageFailure`
    pub async fn calculated_sample(&self, date: NaiveDate) -> BalanceResult<EnergySample> {
        let profile = self
            .store
            .fetch_user()
            .await?
            .ok_or(BalanceError::UserNotFound)?;
        let resting_energy_kcal = self.calculator.resting_energy(&profile)?;

        Ok(EnergySample {
            date,
            resting_energy_kcal,
            active_energy_kcal: self.calculator.fallback_active_energy(resting_energy_kcal),
            weight_kg: Some(profile.weight_kg),
            source: EnergySource::Calculated,
        })
    }
}
