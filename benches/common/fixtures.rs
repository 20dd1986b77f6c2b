// ABOUTME: Benchmark fixtures generating profiles and food logs
// ABOUTME: Deterministic data so runs are comparable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use energy_core::models::{ActivityLevel, FoodEntry, MealType, Sex, UserProfile};

/// Predefined food log sizes
#[derive(Debug, Clone, Copy)]
pub enum DayLogSize {
    /// A light day (5 entries)
    Light,
    /// A typical day (20 entries)
    Typical,
    /// A heavy logger (200 entries)
    Heavy,
}

impl DayLogSize {
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::Light => 5,
            Self::Typical => 20,
            Self::Heavy => 200,
        }
    }
}

/// Fixed benchmark day
#[must_use]
pub fn bench_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap_or_default()
}

/// Spread of profiles across sexes and activity levels
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
#[must_use]
pub fn generate_profiles(count: usize) -> Vec<UserProfile> {
    (0..count)
        .map(|index| {
            let sex = match index % 3 {
                0 => Sex::Male,
                1 => Sex::Female,
                _ => Sex::Other,
            };
            let level = ActivityLevel::ALL[index % ActivityLevel::ALL.len()];
            UserProfile::new(
                18 + (index % 60) as u32,
                50.0 + (index % 70) as f64,
                150.0 + (index % 50) as f64,
                sex,
                level,
            )
        })
        .collect()
}

/// Food entries with all macros set, spread over the day's meals
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn generate_entries(size: DayLogSize) -> Vec<FoodEntry> {
    let midday = Utc.from_utc_datetime(&bench_date().and_hms_opt(12, 0, 0).unwrap_or_default());
    (0..size.count())
        .map(|index| {
            let meal = match index % 4 {
                0 => MealType::Breakfast,
                1 => MealType::Lunch,
                2 => MealType::Dinner,
                _ => MealType::Snack,
            };
            let fats = 5.0 + (index % 20) as f64;
            FoodEntry::new(100.0 + (index * 37 % 500) as f64, midday)
                .with_protein(5.0 + (index % 30) as f64)
                .with_carbs(10.0 + (index % 60) as f64)
                .with_fats(fats, Some(fats / 3.0))
                .with_meal(meal)
        })
        .collect()
}
