// ABOUTME: User profile model with body metrics, sex and activity level
// ABOUTME: Owned by the profile collaborator and never persisted by the engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Biological sex used by the resting energy formula
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Male constant
    Male,
    /// Female constant
    Female,
    /// Mean of the male and female outputs
    Other,
}

/// Activity level for daily energy need
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// 1-3 days/week
    LightlyActive,
    /// 3-5 days/week
    ModeratelyActive,
    /// 6-7 days/week
    VeryActive,
    /// Hard training twice a day
    ExtraActive,
}

impl ActivityLevel {
    /// All levels, least active first
    pub const ALL: [Self; 5] = [
        Self::Sedentary,
        Self::LightlyActive,
        Self::ModeratelyActive,
        Self::VeryActive,
        Self::ExtraActive,
    ];

    /// Parse from a CLI or config string
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "sedentary" => Some(Self::Sedentary),
            "lightly_active" | "light" => Some(Self::LightlyActive),
            "moderately_active" | "moderate" => Some(Self::ModeratelyActive),
            "very_active" | "very" => Some(Self::VeryActive),
            "extra_active" | "extra" => Some(Self::ExtraActive),
            _ => None,
        }
    }
}

/// Display unit preference
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnitPreference {
    /// Kilograms and centimeters
    #[default]
    Metric,
    /// Pounds and inches
    Imperial,
}

/// Body metrics for target calculation
///
/// Metrics are always stored in metric units regardless of `unit_preference`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Profile identifier
    pub id: Uuid,
    /// Age in years
    pub age: u32,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// Biological sex
    pub sex: Sex,
    /// Activity level
    pub activity_level: ActivityLevel,
    /// Display units
    #[serde(default)]
    pub unit_preference: UnitPreference,
}

impl UserProfile {
    /// Create a metric profile with a fresh id
    #[must_use]
    pub fn new(
        age: u32,
        weight_kg: f64,
        height_cm: f64,
        sex: Sex,
        activity_level: ActivityLevel,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            age,
            weight_kg,
            height_cm,
            sex,
            activity_level,
            unit_preference: UnitPreference::Metric,
        }
    }
}
