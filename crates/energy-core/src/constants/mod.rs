// ABOUTME: Physiological constants, safety bounds, and engine timing defaults
// ABOUTME: Named defaults that configuration may override but never re-derive
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Application constants organized by domain.
//!
//! Every value here is a default. `TargetConfig`, `SyncConfig` and friends in the
//! engine crate start from these and accept environment overrides.

/// Mifflin-St Jeor resting energy coefficients
///
/// Reference: Mifflin et al. (1990) DOI: 10.1093/ajcn/51.2.241
pub mod mifflin_st_jeor {
    /// kcal per kg of body weight
    pub const WEIGHT_COEF: f64 = 10.0;
    /// kcal per cm of height
    pub const HEIGHT_COEF: f64 = 6.25;
    /// kcal per year of age
    pub const AGE_COEF: f64 = -5.0;
    /// Male constant
    pub const MALE_CONSTANT: f64 = 5.0;
    /// Female constant
    pub const FEMALE_CONSTANT: f64 = -161.0;
    /// Floor applied to the male and female outputs (kcal/day)
    pub const MINIMUM_KCAL: f64 = 1000.0;
}

/// Activity multipliers applied to resting energy
///
/// Reference: `McArdle` et al. (2010) - Exercise Physiology
pub mod activity_factors {
    /// Little or no exercise
    pub const SEDENTARY: f64 = 1.2;
    /// Light exercise 1-3 days/week
    pub const LIGHTLY_ACTIVE: f64 = 1.375;
    /// Moderate exercise 3-5 days/week
    pub const MODERATELY_ACTIVE: f64 = 1.55;
    /// Hard exercise 6-7 days/week
    pub const VERY_ACTIVE: f64 = 1.725;
    /// Physical job or twice-daily training
    pub const EXTRA_ACTIVE: f64 = 1.9;
}

/// Energy conversion and calorie target rules
pub mod energy {
    /// Energy stored in one kilogram of body fat (kcal)
    pub const KCAL_PER_KG_FAT: f64 = 7700.0;
    /// Days per week, used to spread the weekly deficit/surplus
    pub const DAYS_PER_WEEK: f64 = 7.0;
    /// Lowest calorie target a lose-weight goal may produce (kcal/day)
    pub const MINIMUM_LOSE_WEIGHT_CALORIES: f64 = 1200.0;
    /// Flat daily surplus for muscle gain goals (kcal/day)
    pub const MUSCLE_GAIN_SURPLUS_KCAL: f64 = 300.0;
    /// Active energy assumed when falling back to calculated values, as a share of resting energy
    pub const FALLBACK_ACTIVE_RATIO: f64 = 0.20;
}

/// Protein grams per kilogram of body weight, one fixed factor per goal type
pub mod protein_factors {
    /// Lose weight (range 1.2-1.6, upper end to preserve lean mass)
    pub const LOSE_WEIGHT: f64 = 1.6;
    /// Maintain weight (DRI baseline)
    pub const MAINTAIN: f64 = 0.8;
    /// Gain weight (range 1.0-1.4)
    pub const GAIN_WEIGHT: f64 = 1.2;
    /// Gain muscle (range 1.6-2.2)
    pub const GAIN_MUSCLE: f64 = 2.0;
}

/// Hydration defaults
pub mod hydration {
    /// Default daily water target per kg of body weight (ml)
    pub const ML_PER_KG: f64 = 35.0;
}

/// Weekly weight-change rate bounds (kg/week), inclusive
pub mod goal_bounds {
    /// Fastest allowed loss
    pub const LOSE_MIN_RATE: f64 = -1.0;
    /// Slowest allowed loss
    pub const LOSE_MAX_RATE: f64 = 0.0;
    /// Slowest allowed gain
    pub const GAIN_MIN_RATE: f64 = 0.0;
    /// Fastest allowed gain
    pub const GAIN_MAX_RATE: f64 = 0.5;
    /// Maintenance drift allowed in either direction
    pub const MAINTAIN_TOLERANCE: f64 = 0.1;
    /// Target weight must be strictly below this (kg)
    pub const MAX_TARGET_WEIGHT_KG: f64 = 1000.0;
}

/// Body metric bounds enforced before any formula is evaluated (exclusive)
pub mod body_metrics {
    /// Age upper bound (years)
    pub const MAX_AGE_YEARS: u32 = 150;
    /// Weight upper bound (kg)
    pub const MAX_WEIGHT_KG: f64 = 1000.0;
    /// Height upper bound (cm)
    pub const MAX_HEIGHT_CM: f64 = 300.0;
}

/// Food entry validation limits (inclusive)
pub mod food_limits {
    /// Calories per entry
    pub const MAX_CALORIES: f64 = 10_000.0;
    /// Protein grams per entry
    pub const MAX_PROTEIN_G: f64 = 1000.0;
    /// Carbohydrate grams per entry
    pub const MAX_CARBS_G: f64 = 1000.0;
    /// Fat grams per entry
    pub const MAX_FATS_G: f64 = 500.0;
    /// Saturated fat grams per entry
    pub const MAX_SATURATED_FATS_G: f64 = 500.0;
    /// Free-text label length (characters)
    pub const MAX_LABEL_CHARS: usize = 500;
}

/// Fallback daily targets when neither a goal nor a profile exists
pub mod default_targets {
    /// Calories (kcal)
    pub const CALORIES: f64 = 2000.0;
    /// Protein (g)
    pub const PROTEIN_G: f64 = 50.0;
    /// Water (ml)
    pub const WATER_ML: f64 = 2500.0;
}

/// Background sync and debounce timing defaults
pub mod timing {
    /// Periodic sync tick (seconds)
    pub const SYNC_INTERVAL_SECS: u64 = 300;
    /// How long a terminal sync status stays visible before resetting to idle (ms)
    pub const STATUS_RESET_MS: u64 = 3000;
    /// Per-call external feed timeout (ms)
    pub const FEED_TIMEOUT_MS: u64 = 10_000;
    /// Quiescence window for goal parameter edits (ms)
    pub const GOAL_EDIT_DEBOUNCE_MS: u64 = 1000;
    /// Quiescence window for weight edits (ms)
    pub const WEIGHT_EDIT_DEBOUNCE_MS: u64 = 1500;
    /// Capacity of broadcast channels carrying engine events
    pub const EVENT_CHANNEL_CAPACITY: usize = 64;
}
