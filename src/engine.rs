// ABOUTME: Engine facade wiring calculator, arbiter, ledger, tracker, sync and goal editing together
// ABOUTME: Single entry point for the presentation layer; every collaborator is injected at construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Energy Balance Engine
//!
//! Food, water and exercise changes to the tracked day recompose the published
//! balance from the cached energy sample. Goal changes never rewrite targets
//! already copied into a day.

use crate::balance::BalanceTracker;
use crate::config::{ConfigError, EngineConfig};
use crate::energy::{EnergySourceArbiter, Resolution};
use crate::goals::{GoalEdit, GoalEditDebouncer, GoalSaveEvent, GoalService};
use crate::intelligence::{CalculatedTargets, TargetCalculator, TargetInputs};
use crate::nutrition::NutritionLedger;
use crate::persistence::EnergyStore;
use crate::sync::SyncController;
use chrono::NaiveDate;
use energy_core::models::{
    CalorieBalance, DailyNutrition, FoodEntry, Goal, GoalParameters, GoalType, SyncStatus,
};
use energy_core::{BalanceError, BalanceResult, Clock};
use energy_feed::{FeedClient, HealthFeed};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};
use uuid::Uuid;

/// Real-time energy balance and target reconciliation engine
pub struct EnergyBalanceEngine {
    config: EngineConfig,
    store: Arc<dyn EnergyStore>,
    clock: Arc<dyn Clock>,
    calculator: TargetCalculator,
    arbiter: Arc<EnergySourceArbiter>,
    ledger: Arc<NutritionLedger>,
    tracker: Arc<BalanceTracker>,
    sync: SyncController,
    goals: Arc<GoalService>,
    debouncer: GoalEditDebouncer,
}

impl EnergyBalanceEngine {
    /// Build the engine; without a feed every energy sample is calculated
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `config` fails [`EngineConfig::validate`]
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn EnergyStore>,
        feed: Option<Arc<dyn HealthFeed>>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let calculator = TargetCalculator::new(config.targets.clone());
        let feed = feed.map(|feed| {
            FeedClient::new(feed, config.feed.timeout(), config.feed.circuit_breaker())
        });
        let feed_changes = feed.as_ref().map(FeedClient::subscribe);

        let arbiter = Arc::new(EnergySourceArbiter::new(
            feed,
            Arc::clone(&store),
            calculator.clone(),
        ));
        let ledger = Arc::new(NutritionLedger::new(Arc::clone(&store), calculator.clone()));
        let tracker = Arc::new(BalanceTracker::new(
            Arc::clone(&arbiter),
            Arc::clone(&ledger),
            Arc::clone(&clock),
        ));
        let sync = SyncController::new(
            Arc::clone(&tracker),
            Arc::clone(&clock),
            config.sync.clone(),
            feed_changes,
        );
        let goals = Arc::new(GoalService::new(
            Arc::clone(&store),
            calculator.clone(),
            Arc::clone(&clock),
        ));
        let debouncer = GoalEditDebouncer::new(
            Arc::clone(&goals),
            config.debounce.goal_edit(),
            config.debounce.weight_edit(),
        );

        Ok(Self {
            config,
            store,
            clock,
            calculator,
            arbiter,
            ledger,
            tracker,
            sync,
            goals,
            debouncer,
        })
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The clock's current day
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ================================================================================================
    // Balance and sync
    // ================================================================================================

    /// Most recently published balance for the tracked day
    #[must_use]
    pub fn current_balance(&self) -> Option<CalorieBalance> {
        self.tracker.current()
    }

    /// Observe published balances
    #[must_use]
    pub fn subscribe_balance(&self) -> watch::Receiver<Option<CalorieBalance>> {
        self.tracker.subscribe()
    }

    /// Current sync status
    #[must_use]
    pub fn sync_status(&self) -> SyncStatus {
        self.sync.status()
    }

    /// Observe sync status transitions
    #[must_use]
    pub fn subscribe_sync_status(&self) -> watch::Receiver<SyncStatus> {
        self.sync.subscribe()
    }

    /// Start background syncing for today
    pub async fn start_tracking(&self) {
        self.tracker.track_today().await;
        self.sync.start();
        info!(date = %self.tracker.tracked_date().await, "Balance tracking started");
    }

    /// Stop background syncing
    pub fn stop_tracking(&self) {
        self.sync.stop();
        info!("Balance tracking stopped");
    }

    /// Pin tracking to a specific day
    pub async fn track_date(&self, date: NaiveDate) {
        self.tracker.track_date(date).await;
    }

    /// Pull-to-refresh
    ///
    /// # Errors
    ///
    /// Returns `ExternalFeedFailure` if the feed failed (the fallback balance is
    /// still published), or any error that prevented a balance
    pub async fn manual_refresh(&self) -> BalanceResult<CalorieBalance> {
        self.sync.manual_refresh().await
    }

    /// The app returned to the foreground
    ///
    /// # Errors
    ///
    /// Returns any error that prevented a balance; feed failures fall back silently
    pub async fn notify_foreground(&self) -> BalanceResult<CalorieBalance> {
        self.sync.notify_foreground().await
    }

    /// One-shot balance for any day
    ///
    /// # Errors
    ///
    /// Returns an error if no sample could be produced or the day can't be loaded
    pub async fn balance_for_date(&self, date: NaiveDate) -> BalanceResult<CalorieBalance> {
        self.tracker.balance_for_date(date).await
    }

    /// Energy sample and any feed failure for a day
    ///
    /// # Errors
    ///
    /// See [`EnergySourceArbiter::resolve`]
    pub async fn energy_for_date(&self, date: NaiveDate) -> BalanceResult<Resolution> {
        self.arbiter.resolve(date).await
    }

    // ================================================================================================
    // Nutrition
    // ================================================================================================

    /// The day's nutrition
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the day can't be loaded
    pub async fn daily_nutrition(&self, date: NaiveDate) -> BalanceResult<DailyNutrition> {
        self.ledger.day(date).await
    }

    /// Log a food entry
    ///
    /// # Errors
    ///
    /// Returns a validation error or `StorageFailure`; nothing changes in either case
    pub async fn add_food_entry(&self, date: NaiveDate, entry: FoodEntry) -> BalanceResult<DailyNutrition> {
        let day = self.ledger.add_entry(date, entry).await?;
        self.after_nutrition_change(date).await;
        Ok(day)
    }

    /// Edit a food entry; an id that isn't on that day leaves the day unchanged
    ///
    /// # Errors
    ///
    /// Returns a field validation error or `StorageFailure`
    pub async fn update_food_entry(&self, date: NaiveDate, entry: FoodEntry) -> BalanceResult<DailyNutrition> {
        match self.ledger.update_entry(date, entry).await? {
            Some(day) => {
                self.after_nutrition_change(date).await;
                Ok(day)
            }
            None => self.ledger.day(date).await,
        }
    }

    /// Delete a food entry; returns `None` when it doesn't exist on that day
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the delete can't be written
    pub async fn delete_food_entry(&self, date: NaiveDate, id: Uuid) -> BalanceResult<Option<FoodEntry>> {
        let removed = self.ledger.remove_entry(date, id).await?;
        if removed.is_some() {
            self.after_nutrition_change(date).await;
        }
        Ok(removed)
    }

    /// Record exercise calories burned
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the day can't be written
    pub async fn update_exercise_calories(&self, date: NaiveDate, calories: f64) -> BalanceResult<DailyNutrition> {
        let day = self.ledger.update_exercise_calories(date, calories).await?;
        self.after_nutrition_change(date).await;
        Ok(day)
    }

    /// Record water consumed
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the day can't be written
    pub async fn add_water(&self, date: NaiveDate, ml: f64) -> BalanceResult<DailyNutrition> {
        self.ledger.add_water(date, ml).await
    }

    async fn after_nutrition_change(&self, date: NaiveDate) {
        if date != self.tracker.tracked_date().await {
            return;
        }
        if let Err(error) = self.tracker.recompute().await {
            warn!(%date, error = %error, "Balance not recomputed after nutrition change");
        }
    }

    // ================================================================================================
    // Targets and goals
    // ================================================================================================

    /// Targets for the stored profile with the given goal, without saving anything
    ///
    /// # Errors
    ///
    /// Returns `UnsafeGoalParameter`, `UserNotFound`, `InvalidBodyMetric`, or `StorageFailure`
    pub async fn preview_targets(&self, goal_type: GoalType, weekly_rate_kg: f64) -> BalanceResult<CalculatedTargets> {
        let profile = self
            .store
            .fetch_user()
            .await?
            .ok_or(BalanceError::UserNotFound)?;
        self.calculator
            .validate_goal(&GoalParameters::new(goal_type, weekly_rate_kg), self.clock.today())?;
        self.calculator
            .calculate(&TargetInputs::from_profile(&profile, goal_type, weekly_rate_kg))
    }

    /// The active goal
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the goal can't be read
    pub async fn active_goal(&self) -> BalanceResult<Option<Goal>> {
        self.goals.active_goal().await
    }

    /// Create a new active goal
    ///
    /// # Errors
    ///
    /// See [`GoalService::create_goal`]
    pub async fn create_goal(&self, params: GoalParameters) -> BalanceResult<Goal> {
        self.goals.create_goal(params).await
    }

    /// Update the active goal immediately
    ///
    /// # Errors
    ///
    /// See [`GoalService::update_goal`]
    pub async fn update_goal(&self, params: GoalParameters) -> BalanceResult<Goal> {
        self.goals.update_goal(params).await
    }

    /// Deactivate the active goal
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the goal can't be written
    pub async fn reset_goal(&self) -> BalanceResult<Option<Goal>> {
        self.goals.reset_goal().await
    }

    /// Debounced goal parameter edit
    pub fn edit_goal(&self, edit: GoalEdit) {
        self.debouncer.edit(edit);
    }

    /// Debounced body weight edit
    pub fn edit_weight(&self, weight_kg: f64) {
        self.debouncer.edit_weight(weight_kg);
    }

    /// Save pending goal edits now
    pub async fn flush_goal_edits(&self) {
        self.debouncer.flush().await;
    }

    /// Observe debounced save outcomes
    #[must_use]
    pub fn subscribe_goal_events(&self) -> broadcast::Receiver<GoalSaveEvent> {
        self.debouncer.subscribe()
    }

    /// Re-derive the active goal from today's external expenditure and weight;
    /// returns `None` when there is no active goal or the feed has no data
    ///
    /// # Errors
    ///
    /// Returns `InvalidBodyMetric` for an out-of-range feed weight, `UserNotFound`, or `StorageFailure`
    pub async fn sync_targets_with_feed(&self) -> BalanceResult<Option<Goal>> {
        let sample = self.arbiter.resolve(self.clock.today()).await?.sample;
        if !sample.is_external() {
            return Ok(None);
        }
        self.goals
            .recalculate_active_goal(sample.weight_kg, Some(sample.total_expenditure()))
            .await
    }
}
