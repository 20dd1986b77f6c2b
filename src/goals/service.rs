// ABOUTME: Goal service validating parameters and deriving targets for the single active goal
// ABOUTME: Saving an active goal supersedes any previous one, which is deactivated rather than deleted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::intelligence::{TargetCalculator, TargetInputs};
use crate::logging::EngineLogger;
use crate::persistence::EnergyStore;
use energy_core::models::{Goal, GoalParameters, GoalType, UserProfile};
use energy_core::{BalanceError, BalanceResult, Clock};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Manages the active goal
///
/// Every write reads the active goal, re-derives targets and stores the whole
/// record, so writes are serialized through `write_lock` to keep one save from
/// overwriting another's fields.
pub struct GoalService {
    store: Arc<dyn EnergyStore>,
    calculator: TargetCalculator,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl GoalService {
    /// Service over `store`
    #[must_use]
    pub fn new(store: Arc<dyn EnergyStore>, calculator: TargetCalculator, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            calculator,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// The active goal, if any
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the goal can't be read
    pub async fn active_goal(&self) -> BalanceResult<Option<Goal>> {
        Ok(self.store.fetch_active_goal().await?)
    }

    /// Create a new active goal, superseding the current one
    ///
    /// # Errors
    ///
    /// Returns `UnsafeGoalParameter` or `Validation` for bad parameters,
    /// `UserNotFound` without a profile, or `StorageFailure`
    pub async fn create_goal(&self, params: GoalParameters) -> BalanceResult<Goal> {
        let _guard = self.write_lock.lock().await;
        self.create_locked(params).await
    }

    /// Apply new parameters to the active goal, creating one if none exists
    ///
    /// # Errors
    ///
    /// See [`Self::create_goal`]
    pub async fn update_goal(&self, params: GoalParameters) -> BalanceResult<Goal> {
        self.modify_goal(|_| params).await
    }

    /// Derive new parameters from the active goal's current ones and save them
    ///
    /// `edit` sees the parameters as stored when the write starts, so concurrent
    /// writers never merge into a stale copy. Without an active goal it starts
    /// from maintain at zero rate and creates one.
    ///
    /// # Errors
    ///
    /// See [`Self::create_goal`]
    pub async fn modify_goal<F>(&self, edit: F) -> BalanceResult<Goal>
    where
        F: FnOnce(GoalParameters) -> GoalParameters + Send,
    {
        let _guard = self.write_lock.lock().await;
        let Some(mut goal) = self.store.fetch_active_goal().await? else {
            return self
                .create_locked(edit(GoalParameters::new(GoalType::Maintain, 0.0)))
                .await;
        };
        let params = edit(goal.parameters());
        let profile = self.profile().await?;
        self.calculator.validate_goal(&params, self.clock.today())?;

        self.apply_parameters(&mut goal, &params, &profile, None)?;
        goal.updated_at = self.clock.now();
        self.save(goal).await
    }

    /// Deactivate the active goal; returns it, or `None` if there was none
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the goal can't be written
    pub async fn reset_goal(&self) -> BalanceResult<Option<Goal>> {
        let _guard = self.write_lock.lock().await;
        let Some(mut goal) = self.store.fetch_active_goal().await? else {
            return Ok(None);
        };
        goal.is_active = false;
        goal.updated_at = self.clock.now();
        self.store.save_goal(&goal).await?;
        tracing::info!(goal.id = %goal.id, "Goal reset");
        Ok(Some(goal))
    }

    /// Re-derive the active goal's targets for a new weight and/or a measured
    /// daily expenditure; returns `None` if there is no active goal
    ///
    /// # Errors
    ///
    /// Returns `InvalidBodyMetric` for an out-of-range weight, `UserNotFound`, or `StorageFailure`
    pub async fn recalculate_active_goal(
        &self,
        weight_kg: Option<f64>,
        measured_tdee: Option<f64>,
    ) -> BalanceResult<Option<Goal>> {
        let _guard = self.write_lock.lock().await;
        let Some(mut goal) = self.store.fetch_active_goal().await? else {
            return Ok(None);
        };
        let profile = self.profile().await?;
        let params = goal.parameters();

        if let Some(weight) = weight_kg {
            goal.basis_weight_kg = Some(weight);
        }
        self.apply_parameters(&mut goal, &params, &profile, measured_tdee)?;
        goal.updated_at = self.clock.now();
        self.save(goal).await.map(Some)
    }

    async fn create_locked(&self, params: GoalParameters) -> BalanceResult<Goal> {
        let profile = self.profile().await?;
        self.calculator.validate_goal(&params, self.clock.today())?;

        let now = self.clock.now();
        let mut goal = Goal {
            id: Uuid::new_v4(),
            goal_type: params.goal_type,
            target_weight_kg: None,
            target_date: None,
            weekly_rate_kg: params.weekly_rate_kg,
            daily_calorie_target: 0.0,
            daily_protein_target_g: 0.0,
            daily_water_target_ml: 0.0,
            water_target_explicit: false,
            basis_weight_kg: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.apply_parameters(&mut goal, &params, &profile, None)?;
        self.save(goal).await
    }

    fn apply_parameters(
        &self,
        goal: &mut Goal,
        params: &GoalParameters,
        profile: &UserProfile,
        measured_tdee: Option<f64>,
    ) -> BalanceResult<()> {
        let weight = goal.basis_weight_kg.unwrap_or(profile.weight_kg);
        let inputs = TargetInputs::from_profile(profile, params.goal_type, params.weekly_rate_kg)
            .with_weight(weight)
            .with_measured_tdee(measured_tdee);
        let targets = self.calculator.calculate(&inputs)?;
        let daily = targets.daily_targets(params.water_target_ml);

        goal.goal_type = params.goal_type;
        goal.target_weight_kg = params.target_weight_kg;
        goal.target_date = params.target_date;
        goal.weekly_rate_kg = params.weekly_rate_kg;
        goal.daily_calorie_target = daily.calories;
        goal.daily_protein_target_g = daily.protein_g;
        goal.daily_water_target_ml = daily.water_ml;
        goal.water_target_explicit = params.water_target_ml.is_some();
        Ok(())
    }

    async fn save(&self, goal: Goal) -> BalanceResult<Goal> {
        if let Err(error) = self.store.save_goal(&goal).await {
            EngineLogger::log_storage_failure("save_goal", &error);
            return Err(error.into());
        }
        EngineLogger::log_goal_saved(&goal);
        Ok(goal)
    }

    async fn profile(&self) -> BalanceResult<UserProfile> {
        self.store
            .fetch_user()
            .await?
            .ok_or(BalanceError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::InMemoryStore;
    use chrono::NaiveDate;
    use energy_core::models::{ActivityLevel, GoalType, Sex};
    use energy_core::FixedClock;

    fn service() -> (GoalService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::with_user(UserProfile::new(
            30,
            80.0,
            180.0,
            Sex::Male,
            ActivityLevel::ModeratelyActive,
        )));
        let clock = Arc::new(FixedClock::on_date(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()));
        (
            GoalService::new(store.clone(), TargetCalculator::default(), clock),
            store,
        )
    }

    #[tokio::test]
    async fn test_create_goal_derives_targets() {
        let (service, _) = service();
        let goal = service
            .create_goal(GoalParameters::new(GoalType::LoseWeight, -0.5))
            .await
            .unwrap();

        // 2759 - 550
        assert!((goal.daily_calorie_target - 2209.0).abs() < 1e-9);
        assert!((goal.daily_protein_target_g - 128.0).abs() < 1e-9);
        assert!((goal.daily_water_target_ml - 2800.0).abs() < 1e-9);
        assert!(!goal.water_target_explicit);
    }

    #[tokio::test]
    async fn test_unsafe_rate_rejected_without_saving() {
        let (service, store) = service();
        let result = service
            .create_goal(GoalParameters::new(GoalType::GainWeight, 0.75))
            .await;

        assert!(matches!(result, Err(BalanceError::UnsafeGoalParameter(_))));
        assert!(store.all_goals().await.is_empty());
    }

    #[tokio::test]
    async fn test_only_one_goal_active() {
        let (service, store) = service();
        let first = service
            .create_goal(GoalParameters::new(GoalType::Maintain, 0.0))
            .await
            .unwrap();
        let second = service
            .create_goal(GoalParameters::new(GoalType::GainMuscle, 0.25))
            .await
            .unwrap();

        let goals = store.all_goals().await;
        assert_eq!(goals.iter().filter(|g| g.is_active).count(), 1);
        assert!(goals.iter().any(|g| g.id == first.id && !g.is_active));
        assert_eq!(service.active_goal().await.unwrap().map(|g| g.id), Some(second.id));
    }

    #[tokio::test]
    async fn test_recalculate_uses_new_weight() {
        let (service, _) = service();
        service
            .create_goal(GoalParameters::new(GoalType::Maintain, 0.0))
            .await
            .unwrap();

        let goal = service
            .recalculate_active_goal(Some(90.0), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(goal.basis_weight_kg, Some(90.0));
        assert!((goal.daily_protein_target_g - 72.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_modify_goal_merges_into_stored_parameters() {
        let (service, _) = service();
        service
            .create_goal(GoalParameters::new(GoalType::LoseWeight, -0.5))
            .await
            .unwrap();
        service.recalculate_active_goal(Some(90.0), None).await.unwrap();

        let goal = service
            .modify_goal(|mut params| {
                params.water_target_ml = Some(3000.0);
                params
            })
            .await
            .unwrap();
        assert_eq!(goal.goal_type, GoalType::LoseWeight);
        assert!((goal.weekly_rate_kg + 0.5).abs() < 1e-9);
        assert_eq!(goal.basis_weight_kg, Some(90.0));
        assert!(goal.water_target_explicit);
    }
}
