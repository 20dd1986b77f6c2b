// ABOUTME: Target calculation configuration: resting energy coefficients, activity factors, goal rules
// ABOUTME: Defaults mirror the physiological constants; every value may be overridden
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use energy_core::constants::{
    activity_factors, energy, goal_bounds, hydration, mifflin_st_jeor, protein_factors,
};
use energy_core::models::{ActivityLevel, GoalType};
use serde::{Deserialize, Serialize};

/// Everything the target calculator needs besides the user's inputs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Resting energy formula
    pub bmr: BmrConfig,
    /// Activity multipliers
    pub activity_factors: ActivityFactorsConfig,
    /// Calorie target rules
    pub energy: EnergyRulesConfig,
    /// Protein factors per goal type
    pub protein: ProteinFactorsConfig,
    /// Weekly rate bounds per goal type
    pub rate_bounds: RateBoundsConfig,
    /// Hydration defaults
    pub hydration: HydrationConfig,
}

/// Mifflin-St Jeor coefficients
///
/// Reference: Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
/// American Journal of Clinical Nutrition, 51(2), 241-247. DOI: 10.1093/ajcn/51.2.241
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmrConfig {
    /// Weight coefficient (10.0)
    pub msj_weight_coef: f64,
    /// Height coefficient (6.25)
    pub msj_height_coef: f64,
    /// Age coefficient (-5.0)
    pub msj_age_coef: f64,
    /// Male constant (+5)
    pub msj_male_constant: f64,
    /// Female constant (-161)
    pub msj_female_constant: f64,
    /// Floor applied to the male and female outputs (1000 kcal/day)
    pub minimum_kcal: f64,
}

impl Default for BmrConfig {
    fn default() -> Self {
        Self {
            msj_weight_coef: mifflin_st_jeor::WEIGHT_COEF,
            msj_height_coef: mifflin_st_jeor::HEIGHT_COEF,
            msj_age_coef: mifflin_st_jeor::AGE_COEF,
            msj_male_constant: mifflin_st_jeor::MALE_CONSTANT,
            msj_female_constant: mifflin_st_jeor::FEMALE_CONSTANT,
            minimum_kcal: mifflin_st_jeor::MINIMUM_KCAL,
        }
    }
}

/// Activity factor multipliers
///
/// Reference: `McArdle`, W.D., Katch, F.I., & Katch, V.L. (2010). Exercise Physiology
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityFactorsConfig {
    /// Sedentary: 1.2
    pub sedentary: f64,
    /// Lightly active: 1.375
    pub lightly_active: f64,
    /// Moderately active: 1.55
    pub moderately_active: f64,
    /// Very active: 1.725
    pub very_active: f64,
    /// Extra active: 1.9
    pub extra_active: f64,
}

impl ActivityFactorsConfig {
    /// Multiplier for an activity level
    #[must_use]
    pub const fn factor(&self, level: ActivityLevel) -> f64 {
        match level {
            ActivityLevel::Sedentary => self.sedentary,
            ActivityLevel::LightlyActive => self.lightly_active,
            ActivityLevel::ModeratelyActive => self.moderately_active,
            ActivityLevel::VeryActive => self.very_active,
            ActivityLevel::ExtraActive => self.extra_active,
        }
    }
}

impl Default for ActivityFactorsConfig {
    fn default() -> Self {
        Self {
            sedentary: activity_factors::SEDENTARY,
            lightly_active: activity_factors::LIGHTLY_ACTIVE,
            moderately_active: activity_factors::MODERATELY_ACTIVE,
            very_active: activity_factors::VERY_ACTIVE,
            extra_active: activity_factors::EXTRA_ACTIVE,
        }
    }
}

/// Calorie target and fallback energy rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyRulesConfig {
    /// kcal per kg of fat mass (7700)
    pub kcal_per_kg_fat: f64,
    /// Floor for lose-weight calorie targets (1200)
    pub minimum_lose_weight_calories: f64,
    /// Flat surplus for gain-muscle goals (300)
    pub muscle_gain_surplus_kcal: f64,
    /// Active energy as a share of resting energy in calculated samples (0.20)
    pub fallback_active_ratio: f64,
}

impl Default for EnergyRulesConfig {
    fn default() -> Self {
        Self {
            kcal_per_kg_fat: energy::KCAL_PER_KG_FAT,
            minimum_lose_weight_calories: energy::MINIMUM_LOSE_WEIGHT_CALORIES,
            muscle_gain_surplus_kcal: energy::MUSCLE_GAIN_SURPLUS_KCAL,
            fallback_active_ratio: energy::FALLBACK_ACTIVE_RATIO,
        }
    }
}

/// Protein grams per kg of body weight
///
/// Reference: Phillips & Van Loon (2011) DOI: 10.1080/02640414.2011.619204
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProteinFactorsConfig {
    /// Lose weight
    pub lose_weight: f64,
    /// Maintain
    pub maintain: f64,
    /// Gain weight
    pub gain_weight: f64,
    /// Gain muscle
    pub gain_muscle: f64,
}

impl ProteinFactorsConfig {
    /// Factor for a goal type
    #[must_use]
    pub const fn factor(&self, goal_type: GoalType) -> f64 {
        match goal_type {
            GoalType::LoseWeight => self.lose_weight,
            GoalType::Maintain => self.maintain,
            GoalType::GainWeight => self.gain_weight,
            GoalType::GainMuscle => self.gain_muscle,
        }
    }
}

impl Default for ProteinFactorsConfig {
    fn default() -> Self {
        Self {
            lose_weight: protein_factors::LOSE_WEIGHT,
            maintain: protein_factors::MAINTAIN,
            gain_weight: protein_factors::GAIN_WEIGHT,
            gain_muscle: protein_factors::GAIN_MUSCLE,
        }
    }
}

/// Inclusive weekly rate bounds (kg/week)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateBoundsConfig {
    /// Fastest allowed loss
    pub lose_min: f64,
    /// Slowest allowed loss
    pub lose_max: f64,
    /// Slowest allowed gain
    pub gain_min: f64,
    /// Fastest allowed gain
    pub gain_max: f64,
    /// Maintenance drift in either direction
    pub maintain_tolerance: f64,
    /// Exclusive upper bound on target weight (kg)
    pub max_target_weight_kg: f64,
}

impl RateBoundsConfig {
    /// Inclusive `(min, max)` rate for a goal type; both gain types share the gain bounds
    #[must_use]
    pub fn bounds(&self, goal_type: GoalType) -> (f64, f64) {
        match goal_type {
            GoalType::LoseWeight => (self.lose_min, self.lose_max),
            GoalType::Maintain => (-self.maintain_tolerance, self.maintain_tolerance),
            GoalType::GainWeight | GoalType::GainMuscle => (self.gain_min, self.gain_max),
        }
    }
}

impl Default for RateBoundsConfig {
    fn default() -> Self {
        Self {
            lose_min: goal_bounds::LOSE_MIN_RATE,
            lose_max: goal_bounds::LOSE_MAX_RATE,
            gain_min: goal_bounds::GAIN_MIN_RATE,
            gain_max: goal_bounds::GAIN_MAX_RATE,
            maintain_tolerance: goal_bounds::MAINTAIN_TOLERANCE,
            max_target_weight_kg: goal_bounds::MAX_TARGET_WEIGHT_KG,
        }
    }
}

/// Hydration defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydrationConfig {
    /// Water target per kg of body weight when none is set explicitly (35 ml)
    pub ml_per_kg: f64,
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self {
            ml_per_kg: hydration::ML_PER_KG,
        }
    }
}
