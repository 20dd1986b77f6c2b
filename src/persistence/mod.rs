// ABOUTME: Persistence interface injected into every engine component
// ABOUTME: Profile, goal, food entry, and daily nutrition records, all fallible
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Persistence
//!
//! The engine never reaches for a global store. Each component receives an
//! `Arc<dyn EnergyStore>` at construction. Food entries are the authoritative
//! record of a day; the stored [`DailyNutrition`] carries the day's targets, water
//! and exercise calories, and its totals are always re-derived from the entries.

/// In-memory store for the demo binary and tests
pub mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use energy_core::models::{DailyNutrition, FoodEntry, Goal, UserProfile};
use energy_core::StorageResult;
use uuid::Uuid;

/// Durable storage for user, goal, food entry, and daily nutrition records
#[async_trait]
pub trait EnergyStore: Send + Sync {
    /// The user's profile, if one exists
    async fn fetch_user(&self) -> StorageResult<Option<UserProfile>>;

    /// The single active goal, if any
    async fn fetch_active_goal(&self) -> StorageResult<Option<Goal>>;

    /// Insert or replace a goal by id; saving an active goal deactivates every other goal
    async fn save_goal(&self, goal: &Goal) -> StorageResult<()>;

    /// Food entries for a day in insertion order
    async fn fetch_food_entries(&self, date: NaiveDate) -> StorageResult<Vec<FoodEntry>>;

    /// Append a food entry to a day
    async fn save_food_entry(&self, date: NaiveDate, entry: &FoodEntry) -> StorageResult<()>;

    /// Replace a food entry by id
    async fn update_food_entry(&self, date: NaiveDate, entry: &FoodEntry) -> StorageResult<()>;

    /// Delete a food entry by id
    async fn delete_food_entry(&self, date: NaiveDate, id: Uuid) -> StorageResult<()>;

    /// Stored aggregate for a day, if one was saved
    async fn fetch_daily_nutrition(&self, date: NaiveDate) -> StorageResult<Option<DailyNutrition>>;

    /// Insert or replace the aggregate for its date
    async fn save_daily_nutrition(&self, day: &DailyNutrition) -> StorageResult<()>;
}
