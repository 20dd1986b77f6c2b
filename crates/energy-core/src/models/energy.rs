// ABOUTME: Per-day energy sample and the calorie balance composed from it
// ABOUTME: Both are transient values produced on demand and never persisted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which source produced an energy sample
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EnergySource {
    /// Every value came from the external health feed
    External,
    /// Every value came from the resting energy formula and the fallback ratio
    Calculated,
}

/// Resting energy, active energy and weight for one day from a single source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EnergySample {
    /// Calendar day
    pub date: NaiveDate,
    /// Resting energy (kcal)
    pub resting_energy_kcal: f64,
    /// Active energy (kcal)
    pub active_energy_kcal: f64,
    /// Body weight (kg), if the source has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Source tag applying to every field
    pub source: EnergySource,
}

impl EnergySample {
    /// Resting plus active energy
    #[must_use]
    pub fn total_expenditure(&self) -> f64 {
        self.resting_energy_kcal + self.active_energy_kcal
    }

    /// Whether the sample came from the external feed
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.source == EnergySource::External
    }
}

/// Calories consumed against calories expended for one day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CalorieBalance {
    /// Calendar day
    pub date: NaiveDate,
    /// Calories consumed (kcal)
    pub calories_consumed: f64,
    /// Resting energy burned (kcal)
    pub resting_energy_burned: f64,
    /// Active energy burned (kcal)
    pub active_energy_burned: f64,
    /// Resting plus active (kcal)
    pub total_energy_expended: f64,
    /// Consumed minus expended; negative means a deficit
    pub balance: f64,
    /// Whether the energy values came from the external feed
    pub is_from_external_feed: bool,
}

impl CalorieBalance {
    /// Compose a balance from consumed calories and an energy sample
    #[must_use]
    pub fn compose(calories_consumed: f64, sample: &EnergySample) -> Self {
        let total_energy_expended = sample.total_expenditure();
        Self {
            date: sample.date,
            calories_consumed,
            resting_energy_burned: sample.resting_energy_kcal,
            active_energy_burned: sample.active_energy_kcal,
            total_energy_expended,
            balance: calories_consumed - total_energy_expended,
            is_from_external_feed: sample.is_external(),
        }
    }

    /// Whether more energy was expended than consumed
    #[must_use]
    pub fn is_deficit(&self) -> bool {
        self.balance < 0.0
    }
}
