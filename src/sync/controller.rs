// ABOUTME: Sync controller refreshing the balance on ticks, feed changes, foregrounding and pull-to-refresh
// ABOUTME: Publishes idle/syncing/succeeded/failed status; terminal states reset to idle after a delay
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Sync Controller
//!
//! `start` spawns one loop that refreshes immediately, then on every interval tick
//! and every feed change notification. `stop` signals the loop; an in-flight
//! refresh completes, but its status is no longer published. There is no
//! automatic retry: a failed tick waits for the next trigger.

use crate::balance::BalanceTracker;
use crate::config::SyncConfig;
use crate::logging::EngineLogger;
use crate::notifications::Observable;
use energy_core::models::{CalorieBalance, SyncFailure, SyncStatus, SyncTrigger};
use energy_core::{AppError, BalanceResult, Clock};
use energy_feed::FeedChange;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

struct SyncShared {
    tracker: Arc<BalanceTracker>,
    clock: Arc<dyn Clock>,
    config: SyncConfig,
    status: Observable<SyncStatus>,
    generation: AtomicU64,
    status_reset: Mutex<Option<JoinHandle<()>>>,
}

impl SyncShared {
    async fn run(self: &Arc<Self>, trigger: SyncTrigger, generation: u64) -> BalanceResult<CalorieBalance> {
        self.set_status(trigger, generation, SyncStatus::Syncing);

        let result = match trigger {
            SyncTrigger::Manual => self.tracker.refresh_strict().await,
            _ => self.tracker.refresh().await,
        };

        let status = match &result {
            Ok(_) => SyncStatus::Succeeded {
                at: self.clock.now(),
            },
            Err(error) => {
                let error = AppError::from(error.clone());
                SyncStatus::Failed(SyncFailure::from_error(&error, self.clock.now()))
            }
        };
        if self.set_status(trigger, generation, status) {
            self.schedule_reset(generation);
        }
        result
    }

    fn set_status(&self, trigger: SyncTrigger, generation: u64, status: SyncStatus) -> bool {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(sync.trigger = trigger.as_str(), "Dropping status from a stopped sync");
            return false;
        }
        EngineLogger::log_sync_transition(trigger, &status);
        self.status.publish(status);
        true
    }

    fn schedule_reset(self: &Arc<Self>, generation: u64) {
        let shared = Arc::clone(self);
        let delay = self.config.status_reset();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.status.update(|status| {
                let reset =
                    status.is_terminal() && shared.generation.load(Ordering::SeqCst) == generation;
                if reset {
                    *status = SyncStatus::Idle;
                }
                reset
            });
        });
        self.replace_reset(Some(task));
    }

    fn replace_reset(&self, task: Option<JoinHandle<()>>) {
        if let Ok(mut pending) = self.status_reset.lock() {
            if let Some(previous) = std::mem::replace(&mut *pending, task) {
                previous.abort();
            }
        }
    }
}

struct RunningLoop {
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

/// Drives balance refreshes and reports their status
pub struct SyncController {
    shared: Arc<SyncShared>,
    feed_changes: Option<broadcast::Receiver<FeedChange>>,
    running: Mutex<Option<RunningLoop>>,
}

impl SyncController {
    /// Controller over `tracker`; `feed_changes` is a receiver on the feed's change channel, if any
    #[must_use]
    pub fn new(
        tracker: Arc<BalanceTracker>,
        clock: Arc<dyn Clock>,
        config: SyncConfig,
        feed_changes: Option<broadcast::Receiver<FeedChange>>,
    ) -> Self {
        Self {
            shared: Arc::new(SyncShared {
                tracker,
                clock,
                config,
                status: Observable::new(SyncStatus::Idle),
                generation: AtomicU64::new(0),
                status_reset: Mutex::new(None),
            }),
            feed_changes,
            running: Mutex::new(None),
        }
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.shared.status.get()
    }

    /// Observe status transitions
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.shared.status.subscribe()
    }

    /// Whether the background loop is running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .is_ok_and(|running| running.as_ref().is_some_and(|r| !r.handle.is_finished()))
    }

    /// Start periodic and change-driven syncing; no-op if already running
    pub fn start(&self) {
        let Ok(mut running) = self.running.lock() else {
            return;
        };
        if running.as_ref().is_some_and(|r| !r.handle.is_finished()) {
            return;
        }

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let mut changes = self.feed_changes.as_ref().map(broadcast::Receiver::resubscribe);
        let shared = Arc::clone(&self.shared);
        let period = shared.config.interval();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => {
                        debug!("Sync loop received shutdown signal");
                        break;
                    }
                    _ = interval.tick() => {
                        Self::run_background(&shared, SyncTrigger::Tick, generation).await;
                    }
                    change = next_change(&mut changes) => {
                        if let Some(change) = change {
                            debug!(?change, "Health feed reported new data");
                            Self::run_background(&shared, SyncTrigger::FeedChange, generation).await;
                        }
                    }
                }
            }
        });

        *running = Some(RunningLoop {
            shutdown_tx,
            handle,
        });
    }

    /// Stop the background loop and cancel the pending status reset; status becomes idle
    pub fn stop(&self) {
        let stopped = self
            .running
            .lock()
            .ok()
            .and_then(|mut running| running.take());
        if let Some(running) = stopped {
            // A full channel means a shutdown is already queued
            let _ = running.shutdown_tx.try_send(());
        }

        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        self.shared.replace_reset(None);
        self.shared.status.publish(SyncStatus::Idle);
    }

    /// Sync now and surface any failure, including a feed failure that fell back
    ///
    /// # Errors
    ///
    /// Returns the refresh error; the status is `failed` in that case
    pub async fn manual_refresh(&self) -> BalanceResult<CalorieBalance> {
        let generation = self.shared.generation.load(Ordering::SeqCst);
        self.shared.run(SyncTrigger::Manual, generation).await
    }

    /// Sync once because the app returned to the foreground
    ///
    /// # Errors
    ///
    /// Returns the refresh error; feed failures fall back silently
    pub async fn notify_foreground(&self) -> BalanceResult<CalorieBalance> {
        let generation = self.shared.generation.load(Ordering::SeqCst);
        self.shared.run(SyncTrigger::Foreground, generation).await
    }

    async fn run_background(shared: &Arc<SyncShared>, trigger: SyncTrigger, generation: u64) {
        if let Err(error) = shared.run(trigger, generation).await {
            warn!(sync.trigger = trigger.as_str(), error = %error, "Background sync failed");
        }
    }
}

impl Drop for SyncController {
    fn drop(&mut self) {
        if let Ok(mut running) = self.running.lock() {
            if let Some(running) = running.take() {
                running.handle.abort();
            }
        }
        self.shared.replace_reset(None);
    }
}

/// Next feed change; pends forever once the feed is gone or when there is none
async fn next_change(changes: &mut Option<broadcast::Receiver<FeedChange>>) -> Option<FeedChange> {
    let Some(receiver) = changes.as_mut() else {
        return std::future::pending().await;
    };
    match receiver.recv().await {
        Ok(change) => Some(change),
        Err(RecvError::Lagged(skipped)) => {
            debug!(skipped, "Feed change notifications coalesced");
            Some(FeedChange::Energy)
        }
        Err(RecvError::Closed) => {
            *changes = None;
            None
        }
    }
}
