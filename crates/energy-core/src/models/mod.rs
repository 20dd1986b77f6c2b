// ABOUTME: Core data models for the energy balance engine
// ABOUTME: Re-exports profile, goal, food entry, daily nutrition, energy and sync types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `UserProfile`: body metrics owned by the profile collaborator, read-only here
//! - `Goal`: the weight-change goal and the targets derived from it
//! - `FoodEntry` / `DailyNutrition`: a day's food log with cached totals
//! - `EnergySample` / `CalorieBalance`: transient per-day energy values
//! - `SyncStatus`: background sync state for UI feedback

mod daily;
mod energy;
mod food;
mod goal;
mod profile;
mod sync;

pub use daily::{display_progress, DailyNutrition, MealSummary, NutritionTotals};
pub use energy::{CalorieBalance, EnergySample, EnergySource};
pub use food::{FoodEntry, MealType};
pub use goal::{DailyTargets, Goal, GoalParameters, GoalType};
pub use profile::{ActivityLevel, Sex, UnitPreference, UserProfile};
pub use sync::{SyncFailure, SyncStatus, SyncTrigger};
