// ABOUTME: Debounced goal editing; bursts of parameter or weight edits produce one save
// ABOUTME: Goal parameter edits and weight edits run on independent quiescence timers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Goal Edit Debouncer
//!
//! Each edit replaces any pending un-fired timer. Once a timer fires the save runs
//! on its own task, so a later edit can only schedule the next save and never
//! interrupts one already in progress. Saves report through [`GoalSaveEvent`].

use super::service::GoalService;
use crate::logging::EngineLogger;
use crate::notifications::EventStream;
use chrono::NaiveDate;
use energy_core::errors::ErrorResponse;
use energy_core::models::{Goal, GoalParameters, GoalType};
use energy_core::{AppError, BalanceResult};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

/// Outcome of a debounced save
#[derive(Debug, Clone)]
pub enum GoalSaveEvent {
    /// The goal was validated and persisted
    Saved(Goal),
    /// Validation or persistence failed; the previous goal is unchanged
    Rejected(ErrorResponse),
}

/// A single field edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GoalEdit {
    /// Change the goal type
    GoalType(GoalType),
    /// Set or clear the target weight
    TargetWeight(Option<f64>),
    /// Set or clear the target date
    TargetDate(Option<NaiveDate>),
    /// Change the weekly rate
    WeeklyRate(f64),
    /// Set an explicit water target, or go back to the derived one
    WaterTarget(Option<f64>),
}

/// Edits accumulated since the last save
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct GoalDraft {
    goal_type: Option<GoalType>,
    target_weight_kg: Option<Option<f64>>,
    target_date: Option<Option<NaiveDate>>,
    weekly_rate_kg: Option<f64>,
    water_target_ml: Option<Option<f64>>,
}

impl GoalDraft {
    fn apply(&mut self, edit: GoalEdit) {
        match edit {
            GoalEdit::GoalType(goal_type) => self.goal_type = Some(goal_type),
            GoalEdit::TargetWeight(weight) => self.target_weight_kg = Some(weight),
            GoalEdit::TargetDate(date) => self.target_date = Some(date),
            GoalEdit::WeeklyRate(rate) => self.weekly_rate_kg = Some(rate),
            GoalEdit::WaterTarget(water) => self.water_target_ml = Some(water),
        }
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn merge_into(self, mut params: GoalParameters) -> GoalParameters {
        if let Some(goal_type) = self.goal_type {
            params.goal_type = goal_type;
        }
        if let Some(weight) = self.target_weight_kg {
            params.target_weight_kg = weight;
        }
        if let Some(date) = self.target_date {
            params.target_date = date;
        }
        if let Some(rate) = self.weekly_rate_kg {
            params.weekly_rate_kg = rate;
        }
        if let Some(water) = self.water_target_ml {
            params.water_target_ml = water;
        }
        params
    }
}

/// Restartable one-shot timer
#[derive(Debug)]
pub struct DebounceTimer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DebounceTimer {
    /// Timer firing `delay` after the most recent schedule
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Run `task` once `delay` passes without another call; replaces any un-fired task
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detach so cancelling the timer can't interrupt a running save
            tokio::spawn(task);
        });

        if let Ok(mut pending) = self.pending.lock() {
            if let Some(previous) = pending.replace(timer) {
                previous.abort();
            }
        }
    }

    /// Cancel the un-fired task; returns whether one was pending
    pub fn cancel(&self) -> bool {
        self.pending
            .lock()
            .ok()
            .and_then(|mut pending| pending.take())
            .is_some_and(|timer| {
                let was_pending = !timer.is_finished();
                timer.abort();
                was_pending
            })
    }

    /// Whether a task is waiting to fire
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.lock().is_ok_and(|pending| {
            pending
                .as_ref()
                .is_some_and(|timer| !timer.is_finished())
        })
    }
}

struct DebouncerInner {
    service: Arc<GoalService>,
    draft: Mutex<GoalDraft>,
    pending_weight: Mutex<Option<f64>>,
    events: EventStream<GoalSaveEvent>,
}

impl DebouncerInner {
    fn take_draft(&self) -> GoalDraft {
        self.draft
            .lock()
            .map(|mut draft| std::mem::take(&mut *draft))
            .unwrap_or_default()
    }

    fn take_weight(&self) -> Option<f64> {
        self.pending_weight
            .lock()
            .ok()
            .and_then(|mut weight| weight.take())
    }

    async fn flush_goal(&self) {
        let draft = self.take_draft();
        if draft.is_empty() {
            return;
        }
        let result = self.save_draft(draft).await;
        self.report(result.map(Some));
    }

    async fn save_draft(&self, draft: GoalDraft) -> BalanceResult<Goal> {
        self.service
            .modify_goal(move |current| draft.merge_into(current))
            .await
    }

    async fn flush_weight(&self) {
        let Some(weight) = self.take_weight() else {
            return;
        };
        let result = self.service.recalculate_active_goal(Some(weight), None).await;
        if matches!(result, Ok(None)) {
            debug!(weight_kg = weight, "Weight edit with no active goal");
        }
        self.report(result);
    }

    fn report(&self, result: BalanceResult<Option<Goal>>) {
        match result {
            Ok(Some(goal)) => {
                self.events.publish(GoalSaveEvent::Saved(goal));
            }
            Ok(None) => {}
            Err(error) => {
                let error = AppError::from(error);
                EngineLogger::log_goal_rejected(&error.message);
                self.events
                    .publish(GoalSaveEvent::Rejected(ErrorResponse::from(error)));
            }
        }
    }
}

/// Coalesces goal edits into debounced saves
pub struct GoalEditDebouncer {
    inner: Arc<DebouncerInner>,
    goal_timer: DebounceTimer,
    weight_timer: DebounceTimer,
}

impl GoalEditDebouncer {
    /// Debouncer saving through `service`
    #[must_use]
    pub fn new(service: Arc<GoalService>, goal_delay: Duration, weight_delay: Duration) -> Self {
        Self {
            inner: Arc::new(DebouncerInner {
                service,
                draft: Mutex::new(GoalDraft::default()),
                pending_weight: Mutex::new(None),
                events: EventStream::new(),
            }),
            goal_timer: DebounceTimer::new(goal_delay),
            weight_timer: DebounceTimer::new(weight_delay),
        }
    }

    /// Observe save outcomes
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GoalSaveEvent> {
        self.inner.events.subscribe()
    }

    /// Record an edit and restart the goal timer
    pub fn edit(&self, edit: GoalEdit) {
        if let Ok(mut draft) = self.inner.draft.lock() {
            draft.apply(edit);
        }
        let inner = Arc::clone(&self.inner);
        self.goal_timer
            .schedule(async move { inner.flush_goal().await });
    }

    /// Record a body weight edit and restart the weight timer
    pub fn edit_weight(&self, weight_kg: f64) {
        if let Ok(mut pending) = self.inner.pending_weight.lock() {
            *pending = Some(weight_kg);
        }
        let inner = Arc::clone(&self.inner);
        self.weight_timer
            .schedule(async move { inner.flush_weight().await });
    }

    /// Whether any edit is waiting for its timer
    #[must_use]
    pub fn has_pending_edits(&self) -> bool {
        self.goal_timer.is_pending() || self.weight_timer.is_pending()
    }

    /// Save pending edits immediately
    pub async fn flush(&self) {
        self.goal_timer.cancel();
        self.weight_timer.cancel();
        self.inner.flush_goal().await;
        self.inner.flush_weight().await;
    }

    /// Discard pending edits
    pub fn cancel(&self) {
        self.goal_timer.cancel();
        self.weight_timer.cancel();
        self.inner.take_draft();
        self.inner.take_weight();
    }
}
