// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides logging setup, reference profiles, engine builders, and a failure-injecting store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `energy_balance`

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use energy_balance::config::EngineConfig;
use energy_balance::engine::EnergyBalanceEngine;
use energy_balance::persistence::{EnergyStore, InMemoryStore};
use energy_core::models::{
    ActivityLevel, DailyNutrition, FoodEntry, Goal, Sex, UserProfile,
};
use energy_core::{FixedClock, StorageError, StorageResult};
use energy_feed::{HealthFeed, SyntheticHealthFeed};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fixed test day
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

/// Clock pinned to midday of [`test_date`]
pub fn test_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::on_date(test_date()))
}

/// Male, 30 years, 80 kg, 180 cm: resting energy 1780 kcal
pub fn reference_male(activity_level: ActivityLevel) -> UserProfile {
    UserProfile::new(30, 80.0, 180.0, Sex::Male, activity_level)
}

/// Female, 30 years, 60 kg, 165 cm: resting energy 1320.25 kcal
pub fn reference_female(activity_level: ActivityLevel) -> UserProfile {
    UserProfile::new(30, 60.0, 165.0, Sex::Female, activity_level)
}

/// Food entry consumed at midday of the test day
pub fn food(calories: f64) -> FoodEntry {
    FoodEntry::new(calories, Utc.from_utc_datetime(&test_date().and_hms_opt(12, 0, 0).unwrap()))
}

/// Everything an engine test needs to poke at
pub struct TestEngine {
    pub engine: EnergyBalanceEngine,
    pub store: Arc<FailingStore>,
    pub feed: Option<Arc<SyntheticHealthFeed>>,
    pub clock: Arc<FixedClock>,
}

/// Engine over a reference male profile and a synthetic feed
pub fn engine_with_feed(feed: SyntheticHealthFeed) -> TestEngine {
    build_engine(Some(reference_male(ActivityLevel::ModeratelyActive)), Some(feed))
}

/// Engine over a reference male profile with no feed
pub fn engine_without_feed() -> TestEngine {
    build_engine(Some(reference_male(ActivityLevel::ModeratelyActive)), None)
}

/// Engine with an arbitrary profile and feed
pub fn build_engine(profile: Option<UserProfile>, feed: Option<SyntheticHealthFeed>) -> TestEngine {
    init_test_logging();
    let inner = profile.map_or_else(InMemoryStore::new, InMemoryStore::with_user);
    let store = Arc::new(FailingStore::new(inner));
    let feed = feed.map(Arc::new);
    let clock = test_clock();

    let engine = EnergyBalanceEngine::new(
        EngineConfig::default(),
        store.clone(),
        feed.clone().map(|feed| feed as Arc<dyn HealthFeed>),
        clock.clone(),
    )
    .expect("default config is valid");
    TestEngine {
        engine,
        store,
        feed,
        clock,
    }
}

/// Store wrapper that fails writes and slows reads on demand
pub struct FailingStore {
    inner: InMemoryStore,
    fail_entry_writes: AtomicBool,
    fail_day_writes: AtomicBool,
    fail_goal_writes: AtomicBool,
    read_delay_ms: AtomicU64,
}

impl FailingStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            fail_entry_writes: AtomicBool::new(false),
            fail_day_writes: AtomicBool::new(false),
            fail_goal_writes: AtomicBool::new(false),
            read_delay_ms: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    pub fn fail_entry_writes(&self, fail: bool) {
        self.fail_entry_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_day_writes(&self, fail: bool) {
        self.fail_day_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_goal_writes(&self, fail: bool) {
        self.fail_goal_writes.store(fail, Ordering::SeqCst);
    }

    /// Delay every profile and goal read by `delay`
    pub fn set_read_delay(&self, delay: Duration) {
        self.read_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    async fn read_delay(&self) {
        let millis = self.read_delay_ms.load(Ordering::SeqCst);
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }

    fn check(flag: &AtomicBool, entity: &'static str) -> StorageResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StorageError::write_failed(entity, "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl EnergyStore for FailingStore {
    async fn fetch_user(&self) -> StorageResult<Option<UserProfile>> {
        self.read_delay().await;
        self.inner.fetch_user().await
    }

    async fn fetch_active_goal(&self) -> StorageResult<Option<Goal>> {
        self.read_delay().await;
        self.inner.fetch_active_goal().await
    }

    async fn save_goal(&self, goal: &Goal) -> StorageResult<()> {
        Self::check(&self.fail_goal_writes, "goal")?;
        self.inner.save_goal(goal).await
    }

    async fn fetch_food_entries(&self, date: NaiveDate) -> StorageResult<Vec<FoodEntry>> {
        self.inner.fetch_food_entries(date).await
    }

    async fn save_food_entry(&self, date: NaiveDate, entry: &FoodEntry) -> StorageResult<()> {
        Self::check(&self.fail_entry_writes, "food_entry")?;
        self.inner.save_food_entry(date, entry).await
    }

    async fn update_food_entry(&self, date: NaiveDate, entry: &FoodEntry) -> StorageResult<()> {
        Self::check(&self.fail_entry_writes, "food_entry")?;
        self.inner.update_food_entry(date, entry).await
    }

    async fn delete_food_entry(&self, date: NaiveDate, id: Uuid) -> StorageResult<()> {
        Self::check(&self.fail_entry_writes, "food_entry")?;
        self.inner.delete_food_entry(date, id).await
    }

    async fn fetch_daily_nutrition(&self, date: NaiveDate) -> StorageResult<Option<DailyNutrition>> {
        self.inner.fetch_daily_nutrition(date).await
    }

    async fn save_daily_nutrition(&self, day: &DailyNutrition) -> StorageResult<()> {
        Self::check(&self.fail_day_writes, "daily_nutrition")?;
        self.inner.save_daily_nutrition(day).await
    }
}
