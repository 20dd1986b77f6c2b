// ABOUTME: Food entry model with optional macronutrients and meal tagging
// ABOUTME: Validation rejects out-of-bound fields before any aggregate mutation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::food_limits;
use crate::errors::{BalanceError, BalanceResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of meal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Breakfast meal
    Breakfast,
    /// Lunch meal
    Lunch,
    /// Dinner meal
    Dinner,
    /// Snack between meals, also the bucket for untagged entries
    Snack,
}

impl MealType {
    /// All meal types in display order
    pub const ALL: [Self; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    /// Parse meal type from string
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            "snack" => Some(Self::Snack),
            _ => None,
        }
    }
}

/// A single logged food item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodEntry {
    /// Stable identity used for update and delete
    pub id: Uuid,
    /// Energy (kcal)
    pub calories: f64,
    /// Protein in grams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    /// Carbohydrates in grams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<f64>,
    /// Fat in grams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fats_g: Option<f64>,
    /// Saturated fat in grams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturated_fats_g: Option<f64>,
    /// When the food was consumed
    pub consumed_at: DateTime<Utc>,
    /// Meal tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,
    /// Free-text label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FoodEntry {
    /// Entry with calories only and a fresh id
    #[must_use]
    pub fn new(calories: f64, consumed_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            calories,
            protein_g: None,
            carbs_g: None,
            fats_g: None,
            saturated_fats_g: None,
            consumed_at,
            meal_type: None,
            label: None,
        }
    }

    /// Set protein grams
    #[must_use]
    pub fn with_protein(mut self, grams: f64) -> Self {
        self.protein_g = Some(grams);
        self
    }

    /// Set carbohydrate grams
    #[must_use]
    pub fn with_carbs(mut self, grams: f64) -> Self {
        self.carbs_g = Some(grams);
        self
    }

    /// Set fat and optional saturated fat grams
    #[must_use]
    pub fn with_fats(mut self, grams: f64, saturated: Option<f64>) -> Self {
        self.fats_g = Some(grams);
        self.saturated_fats_g = saturated;
        self
    }

    /// Tag with a meal type
    #[must_use]
    pub fn with_meal(mut self, meal_type: MealType) -> Self {
        self.meal_type = Some(meal_type);
        self
    }

    /// Attach a free-text label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Meal bucket for per-meal views; untagged entries count as snacks
    #[must_use]
    pub fn meal_bucket(&self) -> MealType {
        self.meal_type.unwrap_or(MealType::Snack)
    }

    /// Check every field against its bounds
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::Validation` naming the first offending field
    pub fn validate(&self) -> BalanceResult<()> {
        check_range("calories", self.calories, food_limits::MAX_CALORIES)?;
        check_optional("protein", self.protein_g, food_limits::MAX_PROTEIN_G)?;
        check_optional("carbs", self.carbs_g, food_limits::MAX_CARBS_G)?;
        check_optional("fats", self.fats_g, food_limits::MAX_FATS_G)?;
        check_optional(
            "saturated_fats",
            self.saturated_fats_g,
            food_limits::MAX_SATURATED_FATS_G,
        )?;

        if let Some(saturated) = self.saturated_fats_g {
            let fats = self.fats_g.unwrap_or(0.0);
            if saturated > fats {
                return Err(BalanceError::validation(
                    "saturated_fats",
                    format!("{saturated} g exceeds total fats of {fats} g"),
                ));
            }
        }

        if let Some(label) = &self.label {
            let chars = label.chars().count();
            if chars > food_limits::MAX_LABEL_CHARS {
                return Err(BalanceError::validation(
                    "label",
                    format!(
                        "{chars} characters exceeds the limit of {}",
                        food_limits::MAX_LABEL_CHARS
                    ),
                ));
            }
        }

        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, max: f64) -> BalanceResult<()> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(BalanceError::validation(
            field,
            format!("{value} must be between 0 and {max}"),
        ))
    }
}

fn check_optional(field: &'static str, value: Option<f64>, max: f64) -> BalanceResult<()> {
    value.map_or(Ok(()), |v| check_range(field, v, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(calories: f64) -> FoodEntry {
        FoodEntry::new(calories, Utc::now())
    }

    #[test]
    fn test_valid_entry_passes() {
        let food = entry(300.0)
            .with_protein(20.0)
            .with_carbs(40.0)
            .with_fats(10.0, Some(3.0))
            .with_label("Oatmeal");
        assert!(food.validate().is_ok());
    }

    #[test]
    fn test_negative_calories_rejected() {
        let err = entry(-5.0).validate().unwrap_err();
        assert!(matches!(
            err,
            BalanceError::Validation {
                field: "calories",
                ..
            }
        ));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(entry(10_000.0).validate().is_ok());
        assert!(entry(0.0).validate().is_ok());
        assert!(entry(10_000.1).validate().is_err());
        assert!(entry(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_saturated_fats_cannot_exceed_fats() {
        let err = entry(100.0)
            .with_fats(5.0, Some(6.0))
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            BalanceError::Validation {
                field: "saturated_fats",
                ..
            }
        ));

        let mut missing_fats = entry(100.0);
        missing_fats.saturated_fats_g = Some(1.0);
        assert!(missing_fats.validate().is_err());
    }

    #[test]
    fn test_label_length_counts_characters() {
        let ok = entry(1.0).with_label("é".repeat(500));
        assert!(ok.validate().is_ok());

        let too_long = entry(1.0).with_label("a".repeat(501));
        assert!(matches!(
            too_long.validate().unwrap_err(),
            BalanceError::Validation { field: "label", .. }
        ));
    }

    #[test]
    fn test_untagged_entries_bucket_as_snack() {
        assert_eq!(entry(1.0).meal_bucket(), MealType::Snack);
        assert_eq!(
            entry(1.0).with_meal(MealType::Lunch).meal_bucket(),
            MealType::Lunch
        );
    }
}
