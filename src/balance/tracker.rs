// ABOUTME: Balance tracker composing consumed calories with the arbiter's energy sample
// ABOUTME: Publishes the tracked day's balance and answers one-shot queries for other days
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Balance Tracker
//!
//! `balance = consumed - (resting + active)`. Composition is a pure function of
//! the ledger's total and the latest sample, so recomputing after a food edit
//! reuses the cached sample instead of going back to the feed.
//!
//! The tracker follows the clock's current day until [`BalanceTracker::track_date`]
//! pins another date.

use crate::energy::EnergySourceArbiter;
use crate::notifications::Observable;
use crate::nutrition::NutritionLedger;
use chrono::NaiveDate;
use energy_core::models::{CalorieBalance, EnergySample};
use energy_core::{BalanceError, BalanceResult, Clock};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct Tracking {
    date: NaiveDate,
    follow_today: bool,
}

/// Maintains the current calorie balance
pub struct BalanceTracker {
    arbiter: Arc<EnergySourceArbiter>,
    ledger: Arc<NutritionLedger>,
    clock: Arc<dyn Clock>,
    tracking: Mutex<Tracking>,
    latest_sample: Mutex<Option<EnergySample>>,
    current: Observable<Option<CalorieBalance>>,
}

impl BalanceTracker {
    /// Tracker following the clock's current day
    #[must_use]
    pub fn new(
        arbiter: Arc<EnergySourceArbiter>,
        ledger: Arc<NutritionLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let today = clock.today();
        Self {
            arbiter,
            ledger,
            clock,
            tracking: Mutex::new(Tracking {
                date: today,
                follow_today: true,
            }),
            latest_sample: Mutex::new(None),
            current: Observable::new(None),
        }
    }

    /// Most recently published balance
    #[must_use]
    pub fn current(&self) -> Option<CalorieBalance> {
        self.current.get()
    }

    /// Observe every published balance
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<CalorieBalance>> {
        self.current.subscribe()
    }

    /// Day whose balance is published
    pub async fn tracked_date(&self) -> NaiveDate {
        self.current_date().await
    }

    /// Pin tracking to `date`
    pub async fn track_date(&self, date: NaiveDate) {
        let mut tracking = self.tracking.lock().await;
        tracking.follow_today = false;
        self.switch_date(&mut tracking, date).await;
    }

    /// Go back to following the clock's current day
    pub async fn track_today(&self) {
        let mut tracking = self.tracking.lock().await;
        tracking.follow_today = true;
        let today = self.clock.today();
        self.switch_date(&mut tracking, today).await;
    }

    /// Resolve a fresh sample and publish the balance; feed failures fall back silently
    ///
    /// # Errors
    ///
    /// Returns an error only if no sample could be produced at all or the day
    /// can't be loaded
    pub async fn refresh(&self) -> BalanceResult<CalorieBalance> {
        let date = self.current_date().await;
        let resolution = self.arbiter.resolve(date).await?;
        self.publish_with(resolution.sample).await
    }

    /// Like [`Self::refresh`], but a feed failure is returned after the fallback
    /// balance has been published
    ///
    /// # Errors
    ///
    /// Returns `ExternalFeedFailure` when the feed failed, even if no fallback
    /// sample could be produced, plus the errors of [`Self::refresh`]
    pub async fn refresh_strict(&self) -> BalanceResult<CalorieBalance> {
        let date = self.current_date().await;
        let resolution = self.arbiter.resolve_strict(date).await?;
        let balance = self.publish_with(resolution.sample).await?;

        match resolution.feed_error {
            Some(error) => Err(BalanceError::ExternalFeedFailure(error)),
            None => Ok(balance),
        }
    }

    /// Recompose with the cached sample after a food or exercise change
    ///
    /// # Errors
    ///
    /// See [`Self::refresh`], used when no sample is cached for the tracked day
    pub async fn recompute(&self) -> BalanceResult<CalorieBalance> {
        let date = self.current_date().await;
        let cached = (*self.latest_sample.lock().await).filter(|sample| sample.date == date);

        match cached {
            Some(sample) => self.publish_with(sample).await,
            None => self.refresh().await,
        }
    }

    /// Balance for any day without changing what is tracked or published
    ///
    /// # Errors
    ///
    /// Returns an error if no sample could be produced or the day can't be loaded
    pub async fn balance_for_date(&self, date: NaiveDate) -> BalanceResult<CalorieBalance> {
        let sample = self.arbiter.sample_for(date).await?;
        let consumed = self.ledger.calories_consumed(date).await?;
        Ok(CalorieBalance::compose(consumed, &sample))
    }

    async fn publish_with(&self, sample: EnergySample) -> BalanceResult<CalorieBalance> {
        let consumed = self.ledger.calories_consumed(sample.date).await?;
        let balance = CalorieBalance::compose(consumed, &sample);

        // Drop results for a day that stopped being tracked mid-refresh
        if sample.date != self.current_date().await {
            return Ok(balance);
        }

        *self.latest_sample.lock().await = Some(sample);
        self.current.publish(Some(balance));
        debug!(
            date = %balance.date,
            balance = balance.balance,
            external = balance.is_from_external_feed,
            "Calorie balance published"
        );
        Ok(balance)
    }

    async fn current_date(&self) -> NaiveDate {
        let mut tracking = self.tracking.lock().await;
        if tracking.follow_today {
            let today = self.clock.today();
            if today != tracking.date {
                self.switch_date(&mut tracking, today).await;
            }
        }
        tracking.date
    }

    async fn switch_date(&self, tracking: &mut Tracking, date: NaiveDate) {
        if tracking.date == date {
            return;
        }
        debug!(from = %tracking.date, to = %date, "Tracked day changed");
        tracking.date = date;
        *self.latest_sample.lock().await = None;
        self.current.publish(None);
    }
}
