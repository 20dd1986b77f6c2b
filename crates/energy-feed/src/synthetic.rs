// ABOUTME: Synthetic health feed for development, the demo binary and tests
// ABOUTME: Configurable energy and weight values with failure, latency and authorization injection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Synthetic Health Feed
//!
//! An in-process [`HealthFeed`] with no device or OAuth dependency:
//!
//! - Values are set directly and may differ per date
//! - Failures, latency and authorization denial can be injected at any time
//! - Setters publish the matching [`FeedChange`] so subscribers react as they would
//!   to a real store
//!
//! State lives behind a `RwLock`; a poisoned lock surfaces as `FeedError::Unavailable`.

use crate::source::{FeedChange, HealthFeed};
use async_trait::async_trait;
use chrono::NaiveDate;
use energy_core::constants::timing;
use energy_core::{FeedError, FeedResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::RwLock;
use std::time::Duration;
use tokio::sync::broadcast;

const FEED_NAME: &str = "synthetic";

#[derive(Debug)]
struct FeedState {
    resting_energy_kcal: f64,
    active_energy_kcal: f64,
    per_date: HashMap<NaiveDate, (f64, f64)>,
    weight_kg: Option<f64>,
    failure: Option<FeedError>,
    latency: Option<Duration>,
    grants_authorization: bool,
    authorized: bool,
}

/// Configurable in-process health feed
pub struct SyntheticHealthFeed {
    state: RwLock<FeedState>,
    changes: broadcast::Sender<FeedChange>,
    authorization_requests: AtomicU32,
    fetch_count: AtomicU32,
}

impl SyntheticHealthFeed {
    /// Feed returning the same resting and active energy for every date
    #[must_use]
    pub fn new(resting_energy_kcal: f64, active_energy_kcal: f64, weight_kg: Option<f64>) -> Self {
        let (changes, _) = broadcast::channel(timing::EVENT_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(FeedState {
                resting_energy_kcal,
                active_energy_kcal,
                per_date: HashMap::new(),
                weight_kg,
                failure: None,
                latency: None,
                grants_authorization: true,
                authorized: false,
            }),
            changes,
            authorization_requests: AtomicU32::new(0),
            fetch_count: AtomicU32::new(0),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut FeedState)) {
        if let Ok(mut state) = self.state.write() {
            apply(&mut state);
        }
    }

    fn read<T>(&self, view: impl FnOnce(&FeedState) -> T) -> FeedResult<T> {
        self.state
            .read()
            .map(|state| view(&state))
            .map_err(|_| FeedError::unavailable(FEED_NAME, "feed state lock poisoned"))
    }

    /// Publish a change notification to subscribers
    pub fn emit(&self, change: FeedChange) {
        // No subscribers is fine
        let _ = self.changes.send(change);
    }

    /// Replace the default energy values and notify subscribers
    pub fn set_energy(&self, resting_energy_kcal: f64, active_energy_kcal: f64) {
        self.update(|state| {
            state.resting_energy_kcal = resting_energy_kcal;
            state.active_energy_kcal = active_energy_kcal;
        });
        self.emit(FeedChange::Energy);
    }

    /// Set energy values for one date only
    pub fn set_energy_for(&self, date: NaiveDate, resting_energy_kcal: f64, active_energy_kcal: f64) {
        self.update(|state| {
            state
                .per_date
                .insert(date, (resting_energy_kcal, active_energy_kcal));
        });
        self.emit(FeedChange::Energy);
    }

    /// Record a new weight and notify subscribers
    pub fn set_weight(&self, weight_kg: Option<f64>) {
        self.update(|state| state.weight_kg = weight_kg);
        self.emit(FeedChange::Weight);
    }

    /// Add a workout's active energy to the default values and notify subscribers
    pub fn record_workout(&self, active_energy_kcal: f64) {
        self.update(|state| state.active_energy_kcal += active_energy_kcal);
        self.emit(FeedChange::Workout);
    }

    /// Make every fetch fail with `failure`, or clear it with `None`
    pub fn fail_with(&self, failure: Option<FeedError>) {
        self.update(|state| state.failure = failure);
    }

    /// Delay every call by `latency`
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.update(|state| state.latency = latency);
    }

    /// Decline authorization requests and revoke any granted access
    pub fn deny_authorization(&self) {
        self.update(|state| {
            state.grants_authorization = false;
            state.authorized = false;
        });
    }

    /// Grant future authorization requests
    pub fn allow_authorization(&self) {
        self.update(|state| state.grants_authorization = true);
    }

    /// Number of authorization requests received
    #[must_use]
    pub fn authorization_requests(&self) -> u32 {
        self.authorization_requests.load(Ordering::SeqCst)
    }

    /// Number of fetch calls received
    #[must_use]
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) -> FeedResult<()> {
        if let Some(latency) = self.read(|state| state.latency)? {
            tokio::time::sleep(latency).await;
        }
        Ok(())
    }

    async fn begin_fetch(&self) -> FeedResult<()> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await?;
        self.read(|state| {
            if !state.authorized {
                return Err(FeedError::NotAuthorized {
                    provider: FEED_NAME.to_owned(),
                });
            }
            state.failure.clone().map_or(Ok(()), Err)
        })?
    }

    fn energy_for(&self, date: NaiveDate) -> FeedResult<(f64, f64)> {
        self.read(|state| {
            state
                .per_date
                .get(&date)
                .copied()
                .unwrap_or((state.resting_energy_kcal, state.active_energy_kcal))
        })
    }
}

impl Default for SyntheticHealthFeed {
    fn default() -> Self {
        Self::new(1650.0, 450.0, Some(72.0))
    }
}

#[async_trait]
impl HealthFeed for SyntheticHealthFeed {
    fn name(&self) -> &'static str {
        FEED_NAME
    }

    async fn request_authorization(&self) -> FeedResult<()> {
        self.authorization_requests.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await?;
        let granted = self.read(|state| state.grants_authorization)?;
        if !granted {
            return Err(FeedError::AuthorizationDenied {
                provider: FEED_NAME.to_owned(),
            });
        }
        self.update(|state| state.authorized = true);
        Ok(())
    }

    async fn is_authorized(&self) -> bool {
        self.read(|state| state.authorized).unwrap_or(false)
    }

    async fn fetch_active_energy(&self, date: NaiveDate) -> FeedResult<f64> {
        self.begin_fetch().await?;
        Ok(self.energy_for(date)?.1)
    }

    async fn fetch_resting_energy(&self, date: NaiveDate) -> FeedResult<f64> {
        self.begin_fetch().await?;
        Ok(self.energy_for(date)?.0)
    }

    async fn fetch_weight(&self) -> FeedResult<Option<f64>> {
        self.begin_fetch().await?;
        self.read(|state| state.weight_kg)
    }

    fn subscribe(&self) -> broadcast::Receiver<FeedChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_requires_authorization() {
        let feed = SyntheticHealthFeed::default();
        let err = feed.fetch_resting_energy(date(1)).await.unwrap_err();
        assert!(matches!(err, FeedError::NotAuthorized { .. }));

        feed.request_authorization().await.unwrap();
        assert!(feed.is_authorized().await);
        assert!((feed.fetch_resting_energy(date(1)).await.unwrap() - 1650.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_per_date_values_override_defaults() {
        let feed = SyntheticHealthFeed::new(1500.0, 300.0, None);
        feed.request_authorization().await.unwrap();
        feed.set_energy_for(date(2), 1800.0, 600.0);

        assert!((feed.fetch_active_energy(date(1)).await.unwrap() - 300.0).abs() < f64::EPSILON);
        assert!((feed.fetch_active_energy(date(2)).await.unwrap() - 600.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_setters_publish_changes() {
        let feed = SyntheticHealthFeed::default();
        let mut rx = feed.subscribe();

        feed.set_weight(Some(71.5));
        feed.record_workout(250.0);

        assert_eq!(rx.recv().await.unwrap(), FeedChange::Weight);
        assert_eq!(rx.recv().await.unwrap(), FeedChange::Workout);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let feed = SyntheticHealthFeed::default();
        feed.request_authorization().await.unwrap();
        feed.fail_with(Some(FeedError::unavailable(FEED_NAME, "offline")));

        assert!(feed.fetch_weight().await.is_err());
        feed.fail_with(None);
        assert_eq!(feed.fetch_weight().await.unwrap(), Some(72.0));
    }
}
