// ABOUTME: Daily target calculator deriving calorie, protein, and water targets from body metrics
// ABOUTME: Mifflin-St Jeor resting energy, activity multipliers, and goal safety validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Target Calculator
//!
//! Pure functions, no I/O. Every formula takes its coefficients from
//! [`TargetConfig`] so the named defaults can be overridden per deployment.
//!
//! ## References
//!
//! - Mifflin et al. (1990) DOI: 10.1093/ajcn/51.2.241
//! - `McArdle` et al. (2010) - Exercise Physiology
//! - Phillips & Van Loon (2011) DOI: 10.1080/02640414.2011.619204

use crate::config::{
    ActivityFactorsConfig, BmrConfig, EnergyRulesConfig, HydrationConfig, ProteinFactorsConfig,
    RateBoundsConfig, TargetConfig,
};
use chrono::NaiveDate;
use energy_core::constants::{body_metrics, energy};
use energy_core::models::{
    ActivityLevel, DailyTargets, GoalParameters, GoalType, Sex, UserProfile,
};
use energy_core::{BalanceError, BalanceResult, GoalParameterError};
use serde::{Deserialize, Serialize};

/// Inputs for a full target calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInputs {
    /// Age in years
    pub age: u32,
    /// Body weight (kg)
    pub weight_kg: f64,
    /// Height (cm)
    pub height_cm: f64,
    /// Biological sex
    pub sex: Sex,
    /// Activity level
    pub activity_level: ActivityLevel,
    /// Goal type
    pub goal_type: GoalType,
    /// Weekly weight change (kg/week)
    pub weekly_rate_kg: f64,
    /// Externally measured total daily energy expenditure (kcal)
    pub measured_tdee: Option<f64>,
}

impl TargetInputs {
    /// Inputs from a profile and a goal type/rate
    #[must_use]
    pub const fn from_profile(
        profile: &UserProfile,
        goal_type: GoalType,
        weekly_rate_kg: f64,
    ) -> Self {
        Self {
            age: profile.age,
            weight_kg: profile.weight_kg,
            height_cm: profile.height_cm,
            sex: profile.sex,
            activity_level: profile.activity_level,
            goal_type,
            weekly_rate_kg,
            measured_tdee: None,
        }
    }

    /// Use a different body weight
    #[must_use]
    pub const fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight_kg = weight_kg;
        self
    }

    /// Use an externally measured daily expenditure in place of the formula
    #[must_use]
    pub const fn with_measured_tdee(mut self, measured_tdee: Option<f64>) -> Self {
        self.measured_tdee = measured_tdee;
        self
    }
}

/// Result of a full target calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CalculatedTargets {
    /// Resting energy (kcal/day)
    pub resting_energy_kcal: f64,
    /// Daily energy need (kcal/day)
    pub daily_energy_need_kcal: f64,
    /// Daily calorie target (kcal)
    pub calorie_target: f64,
    /// Daily protein target (g)
    pub protein_target_g: f64,
    /// Default daily water target (ml)
    pub water_target_ml: f64,
}

impl CalculatedTargets {
    /// Targets as copied into a day, with an optional explicit water target
    #[must_use]
    pub fn daily_targets(&self, water_override_ml: Option<f64>) -> DailyTargets {
        DailyTargets {
            calories: self.calorie_target,
            protein_g: self.protein_target_g,
            water_ml: water_override_ml.unwrap_or(self.water_target_ml),
        }
    }
}

/// Check age, weight and height against the formula's domain (all exclusive)
///
/// # Errors
///
/// Returns `BalanceError::InvalidBodyMetric` naming the first offending metric
pub fn validate_body_metrics(age: u32, weight_kg: f64, height_cm: f64) -> BalanceResult<()> {
    if age == 0 || age >= body_metrics::MAX_AGE_YEARS {
        return Err(BalanceError::InvalidBodyMetric {
            metric: "age",
            value: f64::from(age),
        });
    }
    if !(weight_kg > 0.0 && weight_kg < body_metrics::MAX_WEIGHT_KG) {
        return Err(BalanceError::InvalidBodyMetric {
            metric: "weight",
            value: weight_kg,
        });
    }
    if !(height_cm > 0.0 && height_cm < body_metrics::MAX_HEIGHT_CM) {
        return Err(BalanceError::InvalidBodyMetric {
            metric: "height",
            value: height_cm,
        });
    }
    Ok(())
}

/// Calculate resting energy using Mifflin-St Jeor
///
/// Formula:
/// - Men: 10 x weight + 6.25 x height - 5 x age + 5
/// - Women: 10 x weight + 6.25 x height - 5 x age - 161
/// - Other: mean of the two
///
/// Male and female outputs are floored at `config.minimum_kcal` before averaging,
/// so the result is always positive.
///
/// # Errors
///
/// Returns `BalanceError::InvalidBodyMetric` if a metric is out of range
pub fn calculate_resting_energy(
    age: u32,
    weight_kg: f64,
    height_cm: f64,
    sex: Sex,
    config: &BmrConfig,
) -> BalanceResult<f64> {
    validate_body_metrics(age, weight_kg, height_cm)?;

    let base = config.msj_weight_coef * weight_kg
        + config.msj_height_coef * height_cm
        + config.msj_age_coef * f64::from(age);
    let male = (base + config.msj_male_constant).max(config.minimum_kcal);
    let female = (base + config.msj_female_constant).max(config.minimum_kcal);

    Ok(match sex {
        Sex::Male => male,
        Sex::Female => female,
        Sex::Other => (male + female) / 2.0,
    })
}

/// Daily energy need: a positive measured expenditure wins over resting x multiplier
#[must_use]
pub fn calculate_daily_energy_need(
    resting_energy_kcal: f64,
    activity_level: ActivityLevel,
    measured_tdee: Option<f64>,
    config: &ActivityFactorsConfig,
) -> f64 {
    match measured_tdee {
        Some(tdee) if tdee > 0.0 => tdee,
        _ => resting_energy_kcal * config.factor(activity_level),
    }
}

/// Daily calorie target for a goal
///
/// - Maintain: need unchanged, the rate is ignored
/// - Lose weight: need + rate x kcal/kg / 7, floored at the minimum
/// - Gain weight: need + rate x kcal/kg / 7
/// - Gain muscle: need + flat surplus
#[must_use]
pub fn calculate_calorie_target(
    daily_energy_need: f64,
    goal_type: GoalType,
    weekly_rate_kg: f64,
    config: &EnergyRulesConfig,
) -> f64 {
    let rate_adjustment = weekly_rate_kg * config.kcal_per_kg_fat / energy::DAYS_PER_WEEK;
    match goal_type {
        GoalType::Maintain => daily_energy_need,
        GoalType::LoseWeight => {
            (daily_energy_need + rate_adjustment).max(config.minimum_lose_weight_calories)
        }
        GoalType::GainWeight => daily_energy_need + rate_adjustment,
        GoalType::GainMuscle => daily_energy_need + config.muscle_gain_surplus_kcal,
    }
}

/// Daily protein target: weight x the goal type's factor
#[must_use]
pub fn calculate_protein_target(
    weight_kg: f64,
    goal_type: GoalType,
    config: &ProteinFactorsConfig,
) -> f64 {
    weight_kg * config.factor(goal_type)
}

/// Default daily water target from body weight
#[must_use]
pub fn calculate_water_target(weight_kg: f64, config: &HydrationConfig) -> f64 {
    weight_kg * config.ml_per_kg
}

/// Validate goal parameters against the safety bounds
///
/// # Errors
///
/// Returns `BalanceError::UnsafeGoalParameter` for a weekly rate outside the goal
/// type's bounds, a target weight outside (0, max), or a target date not after `today`
pub fn validate_goal_parameters(
    params: &GoalParameters,
    today: NaiveDate,
    config: &RateBoundsConfig,
) -> BalanceResult<()> {
    let (min, max) = config.bounds(params.goal_type);
    let rate = params.weekly_rate_kg;
    if !(rate >= min && rate <= max) {
        return Err(GoalParameterError::UnsafeWeightChangeRate {
            goal_type: params.goal_type.as_str(),
            rate,
            min,
            max,
        }
        .into());
    }

    if let Some(target) = params.target_weight_kg {
        if !(target > 0.0 && target < config.max_target_weight_kg) {
            return Err(GoalParameterError::InvalidTargetWeight {
                value: target,
                max: config.max_target_weight_kg,
            }
            .into());
        }
    }

    if let Some(date) = params.target_date {
        if date <= today {
            return Err(GoalParameterError::InvalidTargetDate { date, today }.into());
        }
    }

    if let Some(water) = params.water_target_ml {
        if !(water.is_finite() && water > 0.0) {
            return Err(BalanceError::validation(
                "water_target",
                format!("{water} ml must be positive"),
            ));
        }
    }

    Ok(())
}

/// Target calculator bound to a configuration
#[derive(Debug, Clone, Default)]
pub struct TargetCalculator {
    config: TargetConfig,
}

impl TargetCalculator {
    /// Create a calculator with the given configuration
    #[must_use]
    pub const fn new(config: TargetConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// Resting energy for a profile
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::InvalidBodyMetric` if a metric is out of range
    pub fn resting_energy(&self, profile: &UserProfile) -> BalanceResult<f64> {
        calculate_resting_energy(
            profile.age,
            profile.weight_kg,
            profile.height_cm,
            profile.sex,
            &self.config.bmr,
        )
    }

    /// Active energy assumed alongside a calculated resting energy
    #[must_use]
    pub fn fallback_active_energy(&self, resting_energy_kcal: f64) -> f64 {
        resting_energy_kcal * self.config.energy.fallback_active_ratio
    }

    /// Full calculation: resting energy, daily need, calorie, protein and water targets
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::InvalidBodyMetric` if a metric is out of range
    pub fn calculate(&self, inputs: &TargetInputs) -> BalanceResult<CalculatedTargets> {
        let resting_energy_kcal = calculate_resting_energy(
            inputs.age,
            inputs.weight_kg,
            inputs.height_cm,
            inputs.sex,
            &self.config.bmr,
        )?;
        let daily_energy_need_kcal = calculate_daily_energy_need(
            resting_energy_kcal,
            inputs.activity_level,
            inputs.measured_tdee,
            &self.config.activity_factors,
        );

        Ok(CalculatedTargets {
            resting_energy_kcal,
            daily_energy_need_kcal,
            calorie_target: calculate_calorie_target(
                daily_energy_need_kcal,
                inputs.goal_type,
                inputs.weekly_rate_kg,
                &self.config.energy,
            ),
            protein_target_g: calculate_protein_target(
                inputs.weight_kg,
                inputs.goal_type,
                &self.config.protein,
            ),
            water_target_ml: calculate_water_target(inputs.weight_kg, &self.config.hydration),
        })
    }

    /// Validate goal parameters against the configured bounds
    ///
    /// # Errors
    ///
    /// See [`validate_goal_parameters`]
    pub fn validate_goal(&self, params: &GoalParameters, today: NaiveDate) -> BalanceResult<()> {
        validate_goal_parameters(params, today, &self.config.rate_bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bmr() -> BmrConfig {
        BmrConfig::default()
    }

    #[test]
    fn test_reference_male_resting_energy() {
        let resting = calculate_resting_energy(30, 80.0, 180.0, Sex::Male, &bmr()).unwrap();
        assert!((resting - 1780.0).abs() < f64::EPSILON);

        let need = calculate_daily_energy_need(
            resting,
            ActivityLevel::ModeratelyActive,
            None,
            &ActivityFactorsConfig::default(),
        );
        assert!((need - 2759.0).abs() < 1e-9);
    }

    #[test]
    fn test_other_is_exact_mean() {
        for (age, weight, height) in [(30, 80.0, 180.0), (80, 40.0, 140.0), (1, 3.5, 50.0)] {
            let male = calculate_resting_energy(age, weight, height, Sex::Male, &bmr()).unwrap();
            let female =
                calculate_resting_energy(age, weight, height, Sex::Female, &bmr()).unwrap();
            let other = calculate_resting_energy(age, weight, height, Sex::Other, &bmr()).unwrap();
            assert!(other > 0.0);
            assert_eq!(other.to_bits(), ((male + female) / 2.0).to_bits());
        }
    }

    #[test]
    fn test_metric_bounds_are_exclusive() {
        assert!(validate_body_metrics(0, 70.0, 170.0).is_err());
        assert!(validate_body_metrics(150, 70.0, 170.0).is_err());
        assert!(validate_body_metrics(149, 999.9, 299.9).is_ok());
        assert!(matches!(
            validate_body_metrics(30, 1000.0, 170.0),
            Err(BalanceError::InvalidBodyMetric {
                metric: "weight",
                ..
            })
        ));
        assert!(matches!(
            validate_body_metrics(30, 70.0, f64::NAN),
            Err(BalanceError::InvalidBodyMetric {
                metric: "height",
                ..
            })
        ));
    }

    #[test]
    fn test_measured_tdee_takes_precedence() {
        let factors = ActivityFactorsConfig::default();
        let need =
            calculate_daily_energy_need(1500.0, ActivityLevel::Sedentary, Some(2600.0), &factors);
        assert!((need - 2600.0).abs() < f64::EPSILON);

        let zero =
            calculate_daily_energy_need(1500.0, ActivityLevel::Sedentary, Some(0.0), &factors);
        assert!((zero - 1800.0).abs() < 1e-9);
    }

    #[test]
    fn test_calorie_targets_per_goal_type() {
        let rules = EnergyRulesConfig::default();
        let lose = calculate_calorie_target(2000.0, GoalType::LoseWeight, -0.5, &rules);
        assert!((lose - 1450.0).abs() < 1e-9);

        let floored = calculate_calorie_target(1500.0, GoalType::LoseWeight, -1.0, &rules);
        assert!((floored - 1200.0).abs() < f64::EPSILON);

        let gain = calculate_calorie_target(2000.0, GoalType::GainWeight, 0.25, &rules);
        assert!((gain - 2275.0).abs() < 1e-9);

        let muscle = calculate_calorie_target(2000.0, GoalType::GainMuscle, 0.25, &rules);
        assert!((muscle - 2300.0).abs() < f64::EPSILON);

        let maintain = calculate_calorie_target(2000.0, GoalType::Maintain, 0.1, &rules);
        assert!((maintain - 2000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_protein_is_weight_times_factor() {
        let factors = ProteinFactorsConfig::default();
        for goal_type in [
            GoalType::LoseWeight,
            GoalType::Maintain,
            GoalType::GainWeight,
            GoalType::GainMuscle,
        ] {
            let protein = calculate_protein_target(72.5, goal_type, &factors);
            assert!((protein - 72.5 * factors.factor(goal_type)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_goal_validation() {
        let bounds = RateBoundsConfig::default();
        let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();

        let too_fast = GoalParameters::new(GoalType::LoseWeight, -2.0);
        assert!(matches!(
            validate_goal_parameters(&too_fast, today, &bounds),
            Err(BalanceError::UnsafeGoalParameter(
                GoalParameterError::UnsafeWeightChangeRate { .. }
            ))
        ));

        let edge = GoalParameters::new(GoalType::LoseWeight, -1.0);
        assert!(validate_goal_parameters(&edge, today, &bounds).is_ok());

        let mut heavy = GoalParameters::new(GoalType::GainWeight, 0.5);
        heavy.target_weight_kg = Some(1000.0);
        assert!(matches!(
            validate_goal_parameters(&heavy, today, &bounds),
            Err(BalanceError::UnsafeGoalParameter(
                GoalParameterError::InvalidTargetWeight { .. }
            ))
        ));

        let mut past = GoalParameters::new(GoalType::Maintain, 0.0);
        past.target_date = Some(today);
        assert!(matches!(
            validate_goal_parameters(&past, today, &bounds),
            Err(BalanceError::UnsafeGoalParameter(
                GoalParameterError::InvalidTargetDate { .. }
            ))
        ));

        let drifting = GoalParameters::new(GoalType::Maintain, 0.2);
        assert!(validate_goal_parameters(&drifting, today, &bounds).is_err());
    }
}
