// ABOUTME: Integration tests for the nutrition ledger and daily aggregate
// ABOUTME: Totals consistency, atomic rejection, storage failures, meal grouping, and serialized mutations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use energy_balance::intelligence::TargetCalculator;
use energy_balance::nutrition::NutritionLedger;
use energy_balance::persistence::{EnergyStore, InMemoryStore};
use energy_core::models::{display_progress, GoalParameters, GoalType, MealType};
use energy_core::BalanceError;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn test_add_then_remove_restores_totals() {
    let t = common::engine_without_feed();
    let date = common::test_date();

    let first = common::food(300.0).with_protein(20.0);
    let first_id = first.id;
    t.engine.add_food_entry(date, first).await.unwrap();
    let day = t
        .engine
        .add_food_entry(date, common::food(450.0).with_protein(35.0))
        .await
        .unwrap();
    assert!((day.totals().calories - 750.0).abs() < f64::EPSILON);
    assert!((day.totals().protein_g - 55.0).abs() < f64::EPSILON);

    let removed = t.engine.delete_food_entry(date, first_id).await.unwrap();
    assert_eq!(removed.map(|entry| entry.id), Some(first_id));

    let day = t.engine.daily_nutrition(date).await.unwrap();
    assert!((day.totals().calories - 450.0).abs() < f64::EPSILON);
    assert!((day.totals().protein_g - 35.0).abs() < f64::EPSILON);
    assert!(day.totals_consistent());
}

#[tokio::test]
async fn test_invalid_entry_leaves_day_untouched() {
    let t = common::engine_without_feed();
    let date = common::test_date();
    t.engine.add_food_entry(date, common::food(500.0)).await.unwrap();
    let before = t.engine.daily_nutrition(date).await.unwrap();

    let result = t.engine.add_food_entry(date, common::food(-5.0)).await;
    assert!(matches!(
        result,
        Err(BalanceError::Validation { field: "calories", .. })
    ));

    let saturated_over_total = common::food(200.0).with_fats(10.0, Some(12.0));
    let result = t.engine.add_food_entry(date, saturated_over_total).await;
    assert!(matches!(
        result,
        Err(BalanceError::Validation { field: "saturated_fats", .. })
    ));

    let after = t.engine.daily_nutrition(date).await.unwrap();
    assert_eq!(before, after);
    assert_eq!(t.store.inner().fetch_food_entries(date).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_entry_id_rejected() {
    let t = common::engine_without_feed();
    let date = common::test_date();
    let entry = common::food(300.0);
    let id = entry.id;

    t.engine.add_food_entry(date, entry.clone()).await.unwrap();
    let err = t.engine.add_food_entry(date, entry).await.unwrap_err();
    assert!(matches!(err, BalanceError::Validation { field: "id", .. }));

    let day = t.engine.daily_nutrition(date).await.unwrap();
    assert_eq!(day.entries().len(), 1);
    assert!((day.totals().calories - 300.0).abs() < f64::EPSILON);
    assert_eq!(t.store.inner().fetch_food_entries(date).await.unwrap().len(), 1);

    t.engine.delete_food_entry(date, id).await.unwrap();
    let day = t.engine.daily_nutrition(date).await.unwrap();
    assert!(day.entries().is_empty());
    assert!(day.totals().calories.abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_update_of_unknown_entry_is_a_no_op() {
    let t = common::engine_without_feed();
    let date = common::test_date();
    t.engine.add_food_entry(date, common::food(320.0)).await.unwrap();

    let stranger = common::food(999.0);
    let day = t.engine.update_food_entry(date, stranger).await.unwrap();
    assert_eq!(day.entries().len(), 1);
    assert!((day.totals().calories - 320.0).abs() < f64::EPSILON);

    assert!(t
        .engine
        .delete_food_entry(date, Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_update_replaces_entry_and_recomputes() {
    let t = common::engine_without_feed();
    let date = common::test_date();
    let mut entry = common::food(250.0).with_carbs(30.0);
    t.engine.add_food_entry(date, entry.clone()).await.unwrap();

    entry.calories = 410.0;
    entry.carbs_g = Some(52.0);
    let day = t.engine.update_food_entry(date, entry).await.unwrap();

    assert!((day.totals().calories - 410.0).abs() < f64::EPSILON);
    assert!((day.totals().carbs_g - 52.0).abs() < f64::EPSILON);
    assert!(day.totals_consistent());
}

#[tokio::test]
async fn test_entry_write_failure_commits_nothing() {
    let t = common::engine_without_feed();
    let date = common::test_date();
    t.store.fail_entry_writes(true);

    let result = t.engine.add_food_entry(date, common::food(300.0)).await;
    assert!(matches!(result, Err(BalanceError::StorageFailure(_))));
    assert!(t.engine.daily_nutrition(date).await.unwrap().entries().is_empty());

    t.store.fail_entry_writes(false);
    let day = t.engine.add_food_entry(date, common::food(300.0)).await.unwrap();
    assert_eq!(day.entries().len(), 1);
}

#[tokio::test]
async fn test_aggregate_write_failure_surfaces_for_water() {
    let t = common::engine_without_feed();
    let date = common::test_date();
    t.store.fail_day_writes(true);

    // Entries are authoritative; the aggregate write after an add is best effort
    t.engine.add_food_entry(date, common::food(300.0)).await.unwrap();

    let result = t.engine.add_water(date, 500.0).await;
    assert!(matches!(result, Err(BalanceError::StorageFailure(_))));
    let day = t.engine.daily_nutrition(date).await.unwrap();
    assert!(day.water_consumed_ml().abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_exercise_calories_clamped_and_net_updated() {
    let t = common::engine_without_feed();
    let date = common::test_date();
    t.engine.add_food_entry(date, common::food(1200.0)).await.unwrap();

    let day = t.engine.update_exercise_calories(date, 350.0).await.unwrap();
    assert!((day.net_calories() - 850.0).abs() < f64::EPSILON);

    let day = t.engine.update_exercise_calories(date, -40.0).await.unwrap();
    assert!(day.exercise_calories_burned().abs() < f64::EPSILON);
    assert!((day.net_calories() - 1200.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_untagged_entries_grouped_as_snack() {
    let t = common::engine_without_feed();
    let date = common::test_date();
    t.engine
        .add_food_entry(date, common::food(400.0).with_meal(MealType::Breakfast))
        .await
        .unwrap();
    t.engine.add_food_entry(date, common::food(150.0)).await.unwrap();
    t.engine
        .add_food_entry(date, common::food(90.0).with_meal(MealType::Snack))
        .await
        .unwrap();

    let day = t.engine.daily_nutrition(date).await.unwrap();
    let summaries = day.meal_summaries();
    let snack = summaries
        .iter()
        .find(|summary| summary.meal_type == MealType::Snack)
        .unwrap();
    assert_eq!(snack.entry_count, 2);
    assert!((snack.totals.calories - 240.0).abs() < f64::EPSILON);
    assert_eq!(day.entries_for_meal(MealType::Snack).count(), 2);
}

#[tokio::test]
async fn test_new_day_copies_active_goal_targets() {
    let t = common::engine_without_feed();
    let goal = t
        .engine
        .create_goal(GoalParameters::new(GoalType::LoseWeight, -0.5))
        .await
        .unwrap();

    let day = t.engine.daily_nutrition(common::test_date()).await.unwrap();
    assert_eq!(day.targets, goal.targets());

    // Later goal changes don't rewrite a day that already exists
    t.engine
        .update_goal(GoalParameters::new(GoalType::Maintain, 0.0))
        .await
        .unwrap();
    let day = t.engine.daily_nutrition(common::test_date()).await.unwrap();
    assert_eq!(day.targets, goal.targets());
}

#[tokio::test]
async fn test_progress_can_exceed_target() {
    let t = common::engine_without_feed();
    let date = common::test_date();
    t.engine
        .create_goal(GoalParameters::new(GoalType::LoseWeight, -1.0))
        .await
        .unwrap();
    t.engine.add_food_entry(date, common::food(3000.0)).await.unwrap();

    let day = t.engine.daily_nutrition(date).await.unwrap();
    assert!(day.calorie_progress() > 1.0);
    assert!((display_progress(day.calorie_progress()) - 1.0).abs() < f64::EPSILON);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_keep_totals_consistent() {
    common::init_test_logging();
    let store = Arc::new(InMemoryStore::new());
    let ledger = Arc::new(NutritionLedger::new(store.clone(), TargetCalculator::default()));
    let date = common::test_date();

    let tasks: Vec<_> = (0..50)
        .map(|i| {
            let ledger = ledger.clone();
            tokio::spawn(async move {
                ledger
                    .add_entry(date, common::food(f64::from(i)).with_protein(1.0))
                    .await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let day = ledger.day(date).await.unwrap();
    assert_eq!(day.entries().len(), 50);
    assert!((day.totals().calories - 1225.0).abs() < f64::EPSILON);
    assert!((day.totals().protein_g - 50.0).abs() < f64::EPSILON);
    assert!(day.totals_consistent());
    assert_eq!(store.fetch_food_entries(date).await.unwrap().len(), 50);
}
