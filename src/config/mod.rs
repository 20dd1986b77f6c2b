// ABOUTME: Engine configuration aggregating sync, feed, debounce, and target settings
// ABOUTME: Loads defaults, applies ENERGY_* environment overrides, and validates the result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Engine Configuration Module
//!
//! Configuration is environment-only. [`EngineConfig::load`] starts from the
//! defaults in `energy_core::constants`, applies every `ENERGY_*` variable that is
//! set, and validates the final values.
//!
//! - `runtime` - sync tick, feed timeout and circuit breaker, debounce windows
//! - `targets` - resting energy coefficients, activity factors, goal rules

pub mod error;
pub mod runtime;
pub mod targets;

pub use error::ConfigError;
pub use runtime::{DebounceConfig, FeedConfig, SyncConfig};
pub use targets::{
    ActivityFactorsConfig, BmrConfig, EnergyRulesConfig, HydrationConfig, ProteinFactorsConfig,
    RateBoundsConfig, TargetConfig,
};

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Background sync timing
    pub sync: SyncConfig,
    /// External feed call policy
    pub feed: FeedConfig,
    /// Edit debounce windows
    pub debounce: DebounceConfig,
    /// Target calculation rules
    pub targets: TargetConfig,
}

impl EngineConfig {
    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse environment variable into target if set
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}: {val}")))?;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Sync
        Self::apply_env_var("ENERGY_SYNC_INTERVAL_SECS", &mut self.sync.interval_secs)?;
        Self::apply_env_var("ENERGY_SYNC_STATUS_RESET_MS", &mut self.sync.status_reset_ms)?;

        // Feed
        Self::apply_env_var("ENERGY_FEED_TIMEOUT_MS", &mut self.feed.timeout_ms)?;
        Self::apply_env_var(
            "ENERGY_FEED_FAILURE_THRESHOLD",
            &mut self.feed.failure_threshold,
        )?;
        Self::apply_env_var(
            "ENERGY_FEED_RECOVERY_TIMEOUT_SECS",
            &mut self.feed.recovery_timeout_secs,
        )?;
        Self::apply_env_var(
            "ENERGY_FEED_SUCCESS_THRESHOLD",
            &mut self.feed.success_threshold,
        )?;

        // Debounce
        Self::apply_env_var("ENERGY_DEBOUNCE_GOAL_MS", &mut self.debounce.goal_edit_ms)?;
        Self::apply_env_var(
            "ENERGY_DEBOUNCE_WEIGHT_MS",
            &mut self.debounce.weight_edit_ms,
        )?;

        self.targets = Self::apply_target_overrides(self.targets)?;
        Ok(self)
    }

    fn apply_target_overrides(mut targets: TargetConfig) -> Result<TargetConfig, ConfigError> {
        let bmr = &mut targets.bmr;
        Self::apply_env_var("ENERGY_BMR_WEIGHT_COEF", &mut bmr.msj_weight_coef)?;
        Self::apply_env_var("ENERGY_BMR_HEIGHT_COEF", &mut bmr.msj_height_coef)?;
        Self::apply_env_var("ENERGY_BMR_AGE_COEF", &mut bmr.msj_age_coef)?;
        Self::apply_env_var("ENERGY_BMR_MALE_CONSTANT", &mut bmr.msj_male_constant)?;
        Self::apply_env_var("ENERGY_BMR_FEMALE_CONSTANT", &mut bmr.msj_female_constant)?;
        Self::apply_env_var("ENERGY_BMR_MINIMUM_KCAL", &mut bmr.minimum_kcal)?;

        let factors = &mut targets.activity_factors;
        Self::apply_env_var("ENERGY_ACTIVITY_SEDENTARY", &mut factors.sedentary)?;
        Self::apply_env_var("ENERGY_ACTIVITY_LIGHTLY_ACTIVE", &mut factors.lightly_active)?;
        Self::apply_env_var(
            "ENERGY_ACTIVITY_MODERATELY_ACTIVE",
            &mut factors.moderately_active,
        )?;
        Self::apply_env_var("ENERGY_ACTIVITY_VERY_ACTIVE", &mut factors.very_active)?;
        Self::apply_env_var("ENERGY_ACTIVITY_EXTRA_ACTIVE", &mut factors.extra_active)?;

        let rules = &mut targets.energy;
        Self::apply_env_var("ENERGY_KCAL_PER_KG_FAT", &mut rules.kcal_per_kg_fat)?;
        Self::apply_env_var(
            "ENERGY_MIN_LOSE_WEIGHT_CALORIES",
            &mut rules.minimum_lose_weight_calories,
        )?;
        Self::apply_env_var(
            "ENERGY_MUSCLE_GAIN_SURPLUS_KCAL",
            &mut rules.muscle_gain_surplus_kcal,
        )?;
        Self::apply_env_var(
            "ENERGY_FALLBACK_ACTIVE_RATIO",
            &mut rules.fallback_active_ratio,
        )?;

        let protein = &mut targets.protein;
        Self::apply_env_var("ENERGY_PROTEIN_LOSE_WEIGHT", &mut protein.lose_weight)?;
        Self::apply_env_var("ENERGY_PROTEIN_MAINTAIN", &mut protein.maintain)?;
        Self::apply_env_var("ENERGY_PROTEIN_GAIN_WEIGHT", &mut protein.gain_weight)?;
        Self::apply_env_var("ENERGY_PROTEIN_GAIN_MUSCLE", &mut protein.gain_muscle)?;

        let bounds = &mut targets.rate_bounds;
        Self::apply_env_var("ENERGY_RATE_LOSE_MIN", &mut bounds.lose_min)?;
        Self::apply_env_var("ENERGY_RATE_LOSE_MAX", &mut bounds.lose_max)?;
        Self::apply_env_var("ENERGY_RATE_GAIN_MIN", &mut bounds.gain_min)?;
        Self::apply_env_var("ENERGY_RATE_GAIN_MAX", &mut bounds.gain_max)?;
        Self::apply_env_var(
            "ENERGY_RATE_MAINTAIN_TOLERANCE",
            &mut bounds.maintain_tolerance,
        )?;

        Self::apply_env_var("ENERGY_WATER_ML_PER_KG", &mut targets.hydration.ml_per_kg)?;
        Ok(targets)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.interval_secs == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "Sync interval must be at least one second",
            ));
        }
        if self.feed.timeout_ms == 0 {
            return Err(ConfigError::ValueOutOfRange("Feed timeout must be positive"));
        }
        if self.feed.failure_threshold == 0 || self.feed.success_threshold == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "Circuit breaker thresholds must be at least 1",
            ));
        }
        self.validate_targets()
    }

    fn validate_targets(&self) -> Result<(), ConfigError> {
        let targets = &self.targets;

        if targets.bmr.msj_weight_coef <= 0.0 || targets.bmr.msj_height_coef <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "BMR weight and height coefficients must be positive",
            ));
        }
        if targets.bmr.minimum_kcal <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "Resting energy floor must be positive",
            ));
        }

        let factors = &targets.activity_factors;
        if factors.sedentary < 1.0 || factors.extra_active > 2.5 {
            return Err(ConfigError::ValueOutOfRange(
                "Activity factors must be between 1.0 and 2.5",
            ));
        }
        if factors.sedentary >= factors.lightly_active
            || factors.lightly_active >= factors.moderately_active
            || factors.moderately_active >= factors.very_active
            || factors.very_active >= factors.extra_active
        {
            return Err(ConfigError::InvalidRange(
                "Activity factors must be in ascending order",
            ));
        }

        let rules = &targets.energy;
        if rules.kcal_per_kg_fat <= 0.0 || rules.minimum_lose_weight_calories <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "kcal per kg and lose-weight floor must be positive",
            ));
        }
        if rules.muscle_gain_surplus_kcal < 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "Muscle gain surplus cannot be negative",
            ));
        }
        if !(0.0..=1.0).contains(&rules.fallback_active_ratio) {
            return Err(ConfigError::ValueOutOfRange(
                "Fallback active ratio must be between 0 and 1",
            ));
        }

        let protein = &targets.protein;
        let protein_factors = [
            protein.lose_weight,
            protein.maintain,
            protein.gain_weight,
            protein.gain_muscle,
        ];
        if protein_factors.iter().any(|f| !(0.5..=3.0).contains(f)) {
            return Err(ConfigError::ValueOutOfRange(
                "Protein factors must be between 0.5 and 3.0 g/kg",
            ));
        }

        let bounds = &targets.rate_bounds;
        if !(bounds.lose_min <= bounds.lose_max
            && bounds.lose_max <= 0.0
            && bounds.gain_min >= 0.0
            && bounds.gain_min <= bounds.gain_max)
        {
            return Err(ConfigError::InvalidRange(
                "Weekly rate bounds must satisfy lose_min <= lose_max <= 0 <= gain_min <= gain_max",
            ));
        }
        if bounds.maintain_tolerance < 0.0 || bounds.max_target_weight_kg <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "Maintain tolerance and target weight bound must be non-negative",
            ));
        }

        if targets.hydration.ml_per_kg <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "Water per kg must be positive",
            ));
        }
        Ok(())
    }
}
