// ABOUTME: Nutrition ledger serializing every mutation of a day behind one async lock
// ABOUTME: Validates, persists the entry, then commits and re-derives totals in a single step
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Nutrition Aggregator
//!
//! Each day lives behind its own `RwLock`. A mutation clones the day, applies the
//! change to the clone, persists, and only then swaps the clone in. Readers never
//! see a day whose cached totals disagree with its entries, and a failed write
//! leaves the in-memory day exactly as it was.
//!
//! Food entries are the authoritative record. The stored day aggregate (targets,
//! water, exercise) is written after every entry mutation on a best-effort basis.

use crate::intelligence::{TargetCalculator, TargetInputs};
use crate::logging::EngineLogger;
use crate::persistence::EnergyStore;
use chrono::NaiveDate;
use dashmap::DashMap;
use energy_core::constants::default_targets;
use energy_core::models::{DailyNutrition, DailyTargets, FoodEntry, GoalType};
use energy_core::BalanceResult;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

type DayHandle = Arc<RwLock<DailyNutrition>>;

/// Loads, mutates and persists daily nutrition aggregates
pub struct NutritionLedger {
    store: Arc<dyn EnergyStore>,
    calculator: TargetCalculator,
    days: DashMap<NaiveDate, DayHandle>,
}

impl NutritionLedger {
    /// Ledger backed by `store`
    #[must_use]
    pub fn new(store: Arc<dyn EnergyStore>, calculator: TargetCalculator) -> Self {
        Self {
            store,
            calculator,
            days: DashMap::new(),
        }
    }

    /// Snapshot of the day, loading it from storage on first access
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the day can't be loaded
    pub async fn day(&self, date: NaiveDate) -> BalanceResult<DailyNutrition> {
        let handle = self.handle(date).await?;
        let day = handle.read().await;
        Ok(day.clone())
    }

    /// Calories consumed on `date`
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the day can't be loaded
    pub async fn calories_consumed(&self, date: NaiveDate) -> BalanceResult<f64> {
        let handle = self.handle(date).await?;
        let day = handle.read().await;
        Ok(day.totals().calories)
    }

    /// Add a food entry to `date`
    ///
    /// # Errors
    ///
    /// Returns a validation error before any I/O, or `StorageFailure` if the entry
    /// can't be written. The day is unchanged in both cases.
    pub async fn add_entry(&self, date: NaiveDate, entry: FoodEntry) -> BalanceResult<DailyNutrition> {
        entry.validate()?;
        let handle = self.handle(date).await?;
        let mut day = handle.write().await;

        let mut next = day.clone();
        next.add_entry(entry.clone())?;
        self.store.save_food_entry(date, &entry).await?;

        *day = next;
        let committed = day.clone();
        drop(day);

        self.persist_aggregate(&committed).await;
        debug!(%date, entry.id = %entry.id, calories = entry.calories, "Food entry added");
        Ok(committed)
    }

    /// Replace an existing entry; returns `None` when the id isn't on that day
    ///
    /// # Errors
    ///
    /// Returns a validation error before any I/O, or `StorageFailure` if the entry
    /// can't be written
    pub async fn update_entry(
        &self,
        date: NaiveDate,
        entry: FoodEntry,
    ) -> BalanceResult<Option<DailyNutrition>> {
        entry.validate()?;
        let handle = self.handle(date).await?;
        let mut day = handle.write().await;

        let mut next = day.clone();
        if !next.update_entry(entry.clone())? {
            return Ok(None);
        }
        self.store.update_food_entry(date, &entry).await?;

        *day = next;
        let committed = day.clone();
        drop(day);

        self.persist_aggregate(&committed).await;
        Ok(Some(committed))
    }

    /// Remove an entry; returns the removed entry, or `None` when the id isn't on that day
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the delete can't be written
    pub async fn remove_entry(&self, date: NaiveDate, id: Uuid) -> BalanceResult<Option<FoodEntry>> {
        let handle = self.handle(date).await?;
        let mut day = handle.write().await;

        let mut next = day.clone();
        let Some(removed) = next.remove_entry(id) else {
            return Ok(None);
        };
        self.store.delete_food_entry(date, id).await?;

        *day = next;
        let committed = day.clone();
        drop(day);

        self.persist_aggregate(&committed).await;
        Ok(Some(removed))
    }

    /// Set exercise calories burned on `date`
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the day can't be written
    pub async fn update_exercise_calories(
        &self,
        date: NaiveDate,
        calories: f64,
    ) -> BalanceResult<DailyNutrition> {
        self.mutate_aggregate(date, |day| day.update_exercise_calories(calories))
            .await
    }

    /// Add water consumed on `date`
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the day can't be written
    pub async fn add_water(&self, date: NaiveDate, ml: f64) -> BalanceResult<DailyNutrition> {
        self.mutate_aggregate(date, |day| day.add_water(ml)).await
    }

    /// Set water consumed on `date`
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the day can't be written
    pub async fn set_water(&self, date: NaiveDate, ml: f64) -> BalanceResult<DailyNutrition> {
        self.mutate_aggregate(date, |day| day.set_water_consumed(ml))
            .await
    }

    /// Drop cached days so the next access reloads from storage
    pub fn evict(&self, date: NaiveDate) {
        self.days.remove(&date);
    }

    async fn mutate_aggregate(
        &self,
        date: NaiveDate,
        apply: impl FnOnce(&mut DailyNutrition) + Send,
    ) -> BalanceResult<DailyNutrition> {
        let handle = self.handle(date).await?;
        let mut day = handle.write().await;

        let mut next = day.clone();
        apply(&mut next);
        self.store.save_daily_nutrition(&next).await?;

        *day = next;
        Ok(day.clone())
    }

    async fn persist_aggregate(&self, day: &DailyNutrition) {
        if let Err(error) = self.store.save_daily_nutrition(day).await {
            EngineLogger::log_storage_failure("save_daily_nutrition", &error);
        }
    }

    async fn handle(&self, date: NaiveDate) -> BalanceResult<DayHandle> {
        if let Some(existing) = self.days.get(&date) {
            return Ok(existing.value().clone());
        }

        let loaded = self.load(date).await?;
        // A concurrent loader may have won; keep whichever landed first
        Ok(self
            .days
            .entry(date)
            .or_insert_with(|| Arc::new(RwLock::new(loaded)))
            .value()
            .clone())
    }

    async fn load(&self, date: NaiveDate) -> BalanceResult<DailyNutrition> {
        let stored = self.store.fetch_daily_nutrition(date).await?;
        let entries = self.store.fetch_food_entries(date).await?;

        let day = match stored {
            Some(stored) => {
                let mut day = DailyNutrition::from_entries(date, stored.targets, entries);
                day.set_water_consumed(stored.water_consumed_ml());
                day.update_exercise_calories(stored.exercise_calories_burned());
                day
            }
            None => {
                let targets = self.targets_for_new_day().await?;
                DailyNutrition::from_entries(date, targets, entries)
            }
        };
        debug!(%date, entries = day.entries().len(), "Loaded daily nutrition");
        Ok(day)
    }

    /// Targets copied into a day the first time it is created
    async fn targets_for_new_day(&self) -> BalanceResult<DailyTargets> {
        if let Some(goal) = self.store.fetch_active_goal().await? {
            return Ok(goal.targets());
        }

        let Some(profile) = self.store.fetch_user().await? else {
            return Ok(DailyTargets {
                calories: default_targets::CALORIES,
                protein_g: default_targets::PROTEIN_G,
                water_ml: default_targets::WATER_ML,
            });
        };

        let inputs = TargetInputs::from_profile(&profile, GoalType::Maintain, 0.0);
        Ok(self.calculator.calculate(&inputs)?.daily_targets(None))
    }
}
