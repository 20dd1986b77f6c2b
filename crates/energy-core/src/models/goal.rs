// ABOUTME: Goal model with goal type, weekly rate, and derived daily targets
// ABOUTME: At most one goal is active at a time; superseded goals are deactivated, not deleted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weight-change goal type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Calorie deficit
    LoseWeight,
    /// Calorie balance
    Maintain,
    /// Rate-driven surplus
    GainWeight,
    /// Flat surplus with high protein
    GainMuscle,
}

impl GoalType {
    /// Stable label used in logs and error messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LoseWeight => "lose_weight",
            Self::Maintain => "maintain",
            Self::GainWeight => "gain_weight",
            Self::GainMuscle => "gain_muscle",
        }
    }

    /// Parse from a CLI or config string
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "lose_weight" | "lose" => Some(Self::LoseWeight),
            "maintain" => Some(Self::Maintain),
            "gain_weight" | "gain" => Some(Self::GainWeight),
            "gain_muscle" | "muscle" => Some(Self::GainMuscle),
            _ => None,
        }
    }
}

/// Daily calorie, protein and water targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyTargets {
    /// Calories (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein_g: f64,
    /// Water (ml)
    pub water_ml: f64,
}

/// User-editable goal parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalParameters {
    /// Goal type
    pub goal_type: GoalType,
    /// Optional target weight (kg)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight_kg: Option<f64>,
    /// Optional target date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    /// Weekly weight change (kg/week), negative for loss
    pub weekly_rate_kg: f64,
    /// Explicit water target; derived from body weight when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_target_ml: Option<f64>,
}

impl GoalParameters {
    /// Parameters with only a goal type and weekly rate
    #[must_use]
    pub const fn new(goal_type: GoalType, weekly_rate_kg: f64) -> Self {
        Self {
            goal_type,
            target_weight_kg: None,
            target_date: None,
            weekly_rate_kg,
            water_target_ml: None,
        }
    }
}

/// A weight-change goal and its derived daily targets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    /// Goal identifier
    pub id: Uuid,
    /// Goal type
    pub goal_type: GoalType,
    /// Optional target weight (kg)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight_kg: Option<f64>,
    /// Optional target date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    /// Weekly weight change (kg/week)
    pub weekly_rate_kg: f64,
    /// Derived daily calorie target (kcal)
    pub daily_calorie_target: f64,
    /// Derived daily protein target (g)
    pub daily_protein_target_g: f64,
    /// Daily water target (ml)
    pub daily_water_target_ml: f64,
    /// Whether the water target was set explicitly rather than derived
    #[serde(default)]
    pub water_target_explicit: bool,
    /// Body weight the targets were last derived from (kg)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basis_weight_kg: Option<f64>,
    /// Only one goal is active at a time
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Current daily targets
    #[must_use]
    pub const fn targets(&self) -> DailyTargets {
        DailyTargets {
            calories: self.daily_calorie_target,
            protein_g: self.daily_protein_target_g,
            water_ml: self.daily_water_target_ml,
        }
    }

    /// Editable parameters of this goal
    #[must_use]
    pub fn parameters(&self) -> GoalParameters {
        GoalParameters {
            goal_type: self.goal_type,
            target_weight_kg: self.target_weight_kg,
            target_date: self.target_date,
            weekly_rate_kg: self.weekly_rate_kg,
            water_target_ml: self.water_target_explicit.then_some(self.daily_water_target_ml),
        }
    }
}
