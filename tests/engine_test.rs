// ABOUTME: End-to-end tests driving the engine facade through a tracked day
// ABOUTME: Goal setup, food logging, background sync, feed outage and recovery, and day targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use energy_balance::config::{ConfigError, EngineConfig};
use energy_balance::engine::EnergyBalanceEngine;
use energy_balance::persistence::InMemoryStore;
use energy_core::models::{ActivityLevel, GoalParameters, GoalType, MealType, SyncStatus};
use energy_core::{BalanceError, FeedError};
use energy_feed::SyntheticHealthFeed;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const TICK: Duration = Duration::from_secs(300);

#[tokio::test(start_paused = true)]
async fn test_tracked_day_through_feed_outage() {
    let t = common::engine_with_feed(SyntheticHealthFeed::new(1650.0, 450.0, Some(80.0)));
    let feed = t.feed.clone().unwrap();
    let today = common::test_date();

    t.engine
        .create_goal(GoalParameters::new(GoalType::LoseWeight, -0.5))
        .await
        .unwrap();
    t.engine.start_tracking().await;
    sleep(Duration::from_millis(50)).await;

    let balance = t.engine.current_balance().unwrap();
    assert!(balance.is_from_external_feed);
    assert!((balance.balance + 2100.0).abs() < 1e-9);

    let breakfast = common::food(450.0).with_protein(30.0).with_meal(MealType::Breakfast);
    let day = t.engine.add_food_entry(today, breakfast).await.unwrap();
    assert!((day.targets.calories - 2209.0).abs() < 1e-9);
    assert!((t.engine.current_balance().unwrap().balance + 1650.0).abs() < 1e-9);

    // Background tick during the outage falls back without surfacing anything
    feed.fail_with(Some(FeedError::unavailable("synthetic", "store locked")));
    sleep(TICK).await;
    let fallback = t.engine.current_balance().unwrap();
    assert!(!fallback.is_from_external_feed);
    assert!((fallback.total_energy_expended - 2136.0).abs() < 1e-9);
    assert!(matches!(t.engine.sync_status(), SyncStatus::Succeeded { .. }));

    // Pull-to-refresh reports it
    let result = t.engine.manual_refresh().await;
    assert!(matches!(result, Err(BalanceError::ExternalFeedFailure(_))));
    assert!(matches!(t.engine.sync_status(), SyncStatus::Failed(_)));

    feed.fail_with(None);
    let recovered = t.engine.manual_refresh().await.unwrap();
    assert!(recovered.is_from_external_feed);
    assert!((recovered.calories_consumed - 450.0).abs() < 1e-9);

    t.engine.stop_tracking();
    assert_eq!(t.engine.sync_status(), SyncStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_balance_subscriber_sees_latest_after_food_burst() {
    let t = common::engine_with_feed(SyntheticHealthFeed::new(1700.0, 300.0, None));
    let today = common::test_date();
    let mut balances = t.engine.subscribe_balance();

    t.engine.start_tracking().await;
    sleep(Duration::from_millis(50)).await;

    for calories in [200.0, 350.0, 500.0] {
        t.engine.add_food_entry(today, common::food(calories)).await.unwrap();
    }

    balances.changed().await.unwrap();
    let latest = (*balances.borrow_and_update()).unwrap();
    assert!((latest.calories_consumed - 1050.0).abs() < 1e-9);
    assert!((latest.balance + 950.0).abs() < 1e-9);

    t.engine.stop_tracking();
}

#[tokio::test]
async fn test_new_day_targets_follow_active_goal() {
    let t = common::engine_without_feed();
    let today = common::test_date();
    let tomorrow = today.succ_opt().unwrap();

    let maintain_day = t.engine.daily_nutrition(today).await.unwrap();
    assert!((maintain_day.targets.calories - 2759.0).abs() < 1e-9);

    t.engine
        .create_goal(GoalParameters::new(GoalType::GainWeight, 0.25))
        .await
        .unwrap();
    let goal_day = t.engine.daily_nutrition(tomorrow).await.unwrap();
    assert!((goal_day.targets.calories - 3034.0).abs() < 1e-9);
    assert!((goal_day.targets.protein_g - 96.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_preview_does_not_persist() {
    let t = common::engine_without_feed();
    let preview = t
        .engine
        .preview_targets(GoalType::LoseWeight, -1.0)
        .await
        .unwrap();

    // 2759 - 1100
    assert!((preview.calorie_target - 1659.0).abs() < 1e-9);
    assert!(t.engine.active_goal().await.unwrap().is_none());

    let rejected = t.engine.preview_targets(GoalType::LoseWeight, -1.5).await;
    assert!(matches!(rejected, Err(BalanceError::UnsafeGoalParameter(_))));
}

#[tokio::test]
async fn test_water_and_exercise_logging() {
    let t = common::engine_without_feed();
    let today = common::test_date();

    t.engine.add_water(today, 500.0).await.unwrap();
    let day = t.engine.add_water(today, 750.0).await.unwrap();
    assert!((day.water_consumed_ml() - 1250.0).abs() < f64::EPSILON);

    let day = t.engine.update_exercise_calories(today, 320.0).await.unwrap();
    assert!((day.exercise_calories_burned() - 320.0).abs() < f64::EPSILON);
}

#[test]
fn test_invalid_config_refused_at_construction() {
    let mut config = EngineConfig::default();
    config.sync.interval_secs = 0;
    let store = Arc::new(InMemoryStore::with_user(common::reference_male(
        ActivityLevel::Sedentary,
    )));

    let result = EnergyBalanceEngine::new(config, store, None, common::test_clock());
    assert!(matches!(result, Err(ConfigError::ValueOutOfRange(_))));
}
