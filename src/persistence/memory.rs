// ABOUTME: In-memory EnergyStore implementation backed by concurrent maps
// ABOUTME: Keeps the one-active-goal invariant and per-date entries and aggregates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::EnergyStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use energy_core::models::{DailyNutrition, FoodEntry, Goal, UserProfile};
use energy_core::{StorageError, StorageResult};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory store
///
/// Cloning shares the underlying maps.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    user: Arc<RwLock<Option<UserProfile>>>,
    goals: Arc<RwLock<Vec<Goal>>>,
    entries: Arc<DashMap<NaiveDate, Vec<FoodEntry>>>,
    days: Arc<DashMap<NaiveDate, DailyNutrition>>,
}

impl InMemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a profile already set
    #[must_use]
    pub fn with_user(profile: UserProfile) -> Self {
        Self {
            user: Arc::new(RwLock::new(Some(profile))),
            ..Self::default()
        }
    }

    /// Replace the profile; the profile collaborator owns it, not the engine
    pub async fn set_user(&self, profile: Option<UserProfile>) {
        *self.user.write().await = profile;
    }

    /// Every goal ever saved, including deactivated ones
    pub async fn all_goals(&self) -> Vec<Goal> {
        self.goals.read().await.clone()
    }
}

#[async_trait]
impl EnergyStore for InMemoryStore {
    async fn fetch_user(&self) -> StorageResult<Option<UserProfile>> {
        Ok(self.user.read().await.clone())
    }

    async fn fetch_active_goal(&self) -> StorageResult<Option<Goal>> {
        Ok(self
            .goals
            .read()
            .await
            .iter()
            .find(|goal| goal.is_active)
            .cloned())
    }

    async fn save_goal(&self, goal: &Goal) -> StorageResult<()> {
        let mut goals = self.goals.write().await;
        if goal.is_active {
            for other in goals.iter_mut().filter(|g| g.id != goal.id) {
                other.is_active = false;
            }
        }
        match goals.iter_mut().find(|g| g.id == goal.id) {
            Some(existing) => *existing = goal.clone(),
            None => goals.push(goal.clone()),
        }
        Ok(())
    }

    async fn fetch_food_entries(&self, date: NaiveDate) -> StorageResult<Vec<FoodEntry>> {
        Ok(self
            .entries
            .get(&date)
            .map(|entries| entries.value().clone())
            .unwrap_or_default())
    }

    async fn save_food_entry(&self, date: NaiveDate, entry: &FoodEntry) -> StorageResult<()> {
        let mut entries = self.entries.entry(date).or_default();
        if entries.iter().any(|e| e.id == entry.id) {
            return Err(StorageError::AlreadyExists {
                entity: "food entry",
                id: entry.id.to_string(),
            });
        }
        entries.push(entry.clone());
        Ok(())
    }

    async fn update_food_entry(&self, date: NaiveDate, entry: &FoodEntry) -> StorageResult<()> {
        let not_found = || StorageError::NotFound {
            entity: "food entry",
            id: entry.id.to_string(),
        };
        let mut entries = self.entries.get_mut(&date).ok_or_else(not_found)?;
        let slot = entries
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or_else(not_found)?;
        *slot = entry.clone();
        Ok(())
    }

    async fn delete_food_entry(&self, date: NaiveDate, id: Uuid) -> StorageResult<()> {
        let not_found = || StorageError::NotFound {
            entity: "food entry",
            id: id.to_string(),
        };
        let mut entries = self.entries.get_mut(&date).ok_or_else(not_found)?;
        let index = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(not_found)?;
        entries.remove(index);
        Ok(())
    }

    async fn fetch_daily_nutrition(&self, date: NaiveDate) -> StorageResult<Option<DailyNutrition>> {
        Ok(self.days.get(&date).map(|day| day.value().clone()))
    }

    async fn save_daily_nutrition(&self, day: &DailyNutrition) -> StorageResult<()> {
        self.days.insert(day.date, day.clone());
        Ok(())
    }
}
