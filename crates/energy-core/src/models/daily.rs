// ABOUTME: Date-scoped nutrition aggregate with cached totals derived from its entries
// ABOUTME: Every mutation validates first, then re-derives all totals with a single fold
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::food::{FoodEntry, MealType};
use super::goal::DailyTargets;
use crate::errors::{BalanceError, BalanceResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sums over a set of food entries
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct NutritionTotals {
    /// Calories (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein_g: f64,
    /// Carbohydrates (g)
    pub carbs_g: f64,
    /// Fat (g)
    pub fats_g: f64,
    /// Saturated fat (g)
    pub saturated_fats_g: f64,
}

impl NutritionTotals {
    /// Fold entries in order; absent nutrients contribute zero
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a FoodEntry>) -> Self {
        entries.into_iter().fold(Self::default(), |acc, entry| Self {
            calories: acc.calories + entry.calories,
            protein_g: acc.protein_g + entry.protein_g.unwrap_or(0.0),
            carbs_g: acc.carbs_g + entry.carbs_g.unwrap_or(0.0),
            fats_g: acc.fats_g + entry.fats_g.unwrap_or(0.0),
            saturated_fats_g: acc.saturated_fats_g + entry.saturated_fats_g.unwrap_or(0.0),
        })
    }
}

/// Per-meal view of the day's entries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealSummary {
    /// Meal bucket
    pub meal_type: MealType,
    /// Number of entries in the bucket
    pub entry_count: usize,
    /// Totals over the bucket
    pub totals: NutritionTotals,
}

/// One calendar day of food intake
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyNutrition {
    /// Calendar day
    pub date: NaiveDate,
    /// Entries in insertion order
    entries: Vec<FoodEntry>,
    /// Cached totals over `entries`
    totals: NutritionTotals,
    /// Total calories minus exercise calories
    net_calories: f64,
    /// Water consumed (ml)
    water_consumed_ml: f64,
    /// Calories burned through logged exercise
    exercise_calories_burned: f64,
    /// Targets copied from the active goal when the day was created
    pub targets: DailyTargets,
}

impl DailyNutrition {
    /// Empty day with the given targets
    #[must_use]
    pub const fn new(date: NaiveDate, targets: DailyTargets) -> Self {
        Self {
            date,
            entries: Vec::new(),
            totals: NutritionTotals {
                calories: 0.0,
                protein_g: 0.0,
                carbs_g: 0.0,
                fats_g: 0.0,
                saturated_fats_g: 0.0,
            },
            net_calories: 0.0,
            water_consumed_ml: 0.0,
            exercise_calories_burned: 0.0,
            targets,
        }
    }

    /// Rebuild a day from stored entries, re-deriving every cache
    #[must_use]
    pub fn from_entries(date: NaiveDate, targets: DailyTargets, entries: Vec<FoodEntry>) -> Self {
        let mut day = Self::new(date, targets);
        day.entries = entries;
        day.recompute();
        day
    }

    /// Entries in insertion order
    #[must_use]
    pub fn entries(&self) -> &[FoodEntry] {
        &self.entries
    }

    /// Look up an entry by id
    #[must_use]
    pub fn entry(&self, id: Uuid) -> Option<&FoodEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Cached totals
    #[must_use]
    pub const fn totals(&self) -> NutritionTotals {
        self.totals
    }

    /// Total calories minus exercise calories
    #[must_use]
    pub const fn net_calories(&self) -> f64 {
        self.net_calories
    }

    /// Water consumed (ml)
    #[must_use]
    pub const fn water_consumed_ml(&self) -> f64 {
        self.water_consumed_ml
    }

    /// Exercise calories burned (kcal)
    #[must_use]
    pub const fn exercise_calories_burned(&self) -> f64 {
        self.exercise_calories_burned
    }

    /// Append a validated entry
    ///
    /// # Errors
    ///
    /// Returns a validation error and leaves the day untouched if any field is out of
    /// bounds or an entry with the same id is already on the day
    pub fn add_entry(&mut self, entry: FoodEntry) -> BalanceResult<()> {
        entry.validate()?;
        if self.entries.iter().any(|e| e.id == entry.id) {
            return Err(BalanceError::validation(
                "id",
                format!("entry {} is already logged for {}", entry.id, self.date),
            ));
        }
        self.entries.push(entry);
        self.recompute();
        Ok(())
    }

    /// Replace the entry with the same id; returns `false` if no entry matched
    ///
    /// # Errors
    ///
    /// Returns a validation error and leaves the day untouched if any field is out of bounds
    pub fn update_entry(&mut self, entry: FoodEntry) -> BalanceResult<bool> {
        entry.validate()?;
        let Some(slot) = self.entries.iter_mut().find(|e| e.id == entry.id) else {
            return Ok(false);
        };
        *slot = entry;
        self.recompute();
        Ok(true)
    }

    /// Remove an entry by id, returning it if present
    pub fn remove_entry(&mut self, id: Uuid) -> Option<FoodEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        let removed = self.entries.remove(index);
        self.recompute();
        Some(removed)
    }

    /// Set exercise calories (clamped to zero) and refresh net calories
    pub fn update_exercise_calories(&mut self, calories: f64) {
        self.exercise_calories_burned = clamp_non_negative(calories);
        self.net_calories = self.totals.calories - self.exercise_calories_burned;
    }

    /// Set water consumed (clamped to zero)
    pub fn set_water_consumed(&mut self, ml: f64) {
        self.water_consumed_ml = clamp_non_negative(ml);
    }

    /// Add to water consumed; negative amounts reduce it down to zero
    pub fn add_water(&mut self, ml: f64) {
        self.set_water_consumed(self.water_consumed_ml + ml);
    }

    /// Re-derive every cached total from `entries`
    pub fn recompute(&mut self) {
        self.totals = NutritionTotals::from_entries(&self.entries);
        self.net_calories = self.totals.calories - self.exercise_calories_burned;
    }

    /// Whether the cached totals equal a fresh fold over the entries
    #[must_use]
    pub fn totals_consistent(&self) -> bool {
        let fresh = NutritionTotals::from_entries(&self.entries);
        fresh == self.totals
            && (self.net_calories - (fresh.calories - self.exercise_calories_burned)).abs()
                < f64::EPSILON
    }

    /// Entries in a meal bucket, untagged entries counted as snacks
    pub fn entries_for_meal(&self, meal_type: MealType) -> impl Iterator<Item = &FoodEntry> {
        self.entries
            .iter()
            .filter(move |e| e.meal_bucket() == meal_type)
    }

    /// One summary per meal type in display order
    #[must_use]
    pub fn meal_summaries(&self) -> Vec<MealSummary> {
        MealType::ALL
            .iter()
            .map(|&meal_type| MealSummary {
                meal_type,
                entry_count: self.entries_for_meal(meal_type).count(),
                totals: NutritionTotals::from_entries(self.entries_for_meal(meal_type)),
            })
            .collect()
    }

    /// Calories consumed over target; may exceed 1.0
    #[must_use]
    pub fn calorie_progress(&self) -> f64 {
        ratio(self.totals.calories, self.targets.calories)
    }

    /// Protein consumed over target; may exceed 1.0
    #[must_use]
    pub fn protein_progress(&self) -> f64 {
        ratio(self.totals.protein_g, self.targets.protein_g)
    }

    /// Water consumed over target; may exceed 1.0
    #[must_use]
    pub fn water_progress(&self) -> f64 {
        ratio(self.water_consumed_ml, self.targets.water_ml)
    }
}

/// Clamp a progress ratio into `[0, 1]` for rendering
#[must_use]
pub fn display_progress(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

fn ratio(consumed: f64, target: f64) -> f64 {
    if target > 0.0 {
        consumed / target
    } else {
        0.0
    }
}

fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BalanceError;
    use chrono::Utc;

    fn day() -> DailyNutrition {
        DailyNutrition::new(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            DailyTargets {
                calories: 2000.0,
                protein_g: 100.0,
                water_ml: 2500.0,
            },
        )
    }

    fn food(calories: f64, protein: f64) -> FoodEntry {
        FoodEntry::new(calories, Utc::now()).with_protein(protein)
    }

    #[test]
    fn test_add_and_remove_restores_totals() {
        let mut day = day();
        let first = food(300.0, 20.0);
        let first_id = first.id;
        day.add_entry(first).unwrap();
        day.add_entry(food(450.0, 35.0)).unwrap();

        assert!((day.totals().calories - 750.0).abs() < f64::EPSILON);
        assert!((day.totals().protein_g - 55.0).abs() < f64::EPSILON);

        assert!(day.remove_entry(first_id).is_some());
        assert!((day.totals().calories - 450.0).abs() < f64::EPSILON);
        assert!((day.totals().protein_g - 35.0).abs() < f64::EPSILON);
        assert!(day.totals_consistent());
    }

    #[test]
    fn test_rejected_entry_leaves_day_unchanged() {
        let mut day = day();
        day.add_entry(food(300.0, 20.0)).unwrap();
        let before = day.clone();

        let err = day.add_entry(food(-5.0, 0.0)).unwrap_err();
        assert!(matches!(err, BalanceError::Validation { .. }));
        assert_eq!(day, before);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut day = day();
        let entry = food(300.0, 20.0);
        day.add_entry(entry.clone()).unwrap();
        let before = day.clone();

        let err = day.add_entry(entry).unwrap_err();
        assert!(matches!(err, BalanceError::Validation { field: "id", .. }));
        assert_eq!(day, before);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut day = day();
        day.add_entry(food(300.0, 20.0)).unwrap();
        let before = day.clone();

        assert!(!day.update_entry(food(999.0, 1.0)).unwrap());
        assert_eq!(day, before);
    }

    #[test]
    fn test_update_replaces_by_id() {
        let mut day = day();
        let entry = food(300.0, 20.0);
        let mut edited = entry.clone();
        day.add_entry(entry).unwrap();

        edited.calories = 500.0;
        assert!(day.update_entry(edited).unwrap());
        assert!((day.totals().calories - 500.0).abs() < f64::EPSILON);
        assert_eq!(day.entries().len(), 1);
    }

    #[test]
    fn test_exercise_calories_clamped_and_net_updated() {
        let mut day = day();
        day.add_entry(food(1000.0, 0.0)).unwrap();

        day.update_exercise_calories(250.0);
        assert!((day.net_calories() - 750.0).abs() < f64::EPSILON);

        day.update_exercise_calories(-40.0);
        assert!(day.exercise_calories_burned().abs() < f64::EPSILON);
        assert!((day.net_calories() - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut day = day();
        day.add_entry(food(123.4, 5.6)).unwrap();
        day.add_entry(food(0.1, 0.2)).unwrap();
        let once = day.clone();
        day.recompute();
        day.recompute();
        assert_eq!(day, once);
    }

    #[test]
    fn test_meal_summaries_bucket_untagged_as_snack() {
        let mut day = day();
        day.add_entry(food(300.0, 10.0).with_meal(MealType::Breakfast))
            .unwrap();
        day.add_entry(food(150.0, 5.0)).unwrap();
        day.add_entry(food(100.0, 2.0).with_meal(MealType::Snack))
            .unwrap();

        let summaries = day.meal_summaries();
        assert_eq!(summaries.len(), 4);
        let snack = summaries
            .iter()
            .find(|s| s.meal_type == MealType::Snack)
            .unwrap();
        assert_eq!(snack.entry_count, 2);
        assert!((snack.totals.calories - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_may_exceed_one() {
        let mut day = day();
        day.add_entry(food(3000.0, 150.0)).unwrap();
        assert!((day.calorie_progress() - 1.5).abs() < f64::EPSILON);
        assert!((display_progress(day.calorie_progress()) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_water_clamped_at_zero() {
        let mut day = day();
        day.add_water(500.0);
        day.add_water(-800.0);
        assert!(day.water_consumed_ml().abs() < f64::EPSILON);
        day.set_water_consumed(1250.0);
        assert!((day.water_progress() - 0.5).abs() < f64::EPSILON);
    }
}
