// ABOUTME: Target intelligence module for goal-derived daily nutrition targets
// ABOUTME: Re-exports the target calculator and its pure calculation functions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Resting energy, daily need, and goal target calculation
pub mod target_calculator;

pub use target_calculator::{
    calculate_calorie_target, calculate_daily_energy_need, calculate_protein_target,
    calculate_resting_energy, calculate_water_target, validate_body_metrics,
    validate_goal_parameters, CalculatedTargets, TargetCalculator, TargetInputs,
};
