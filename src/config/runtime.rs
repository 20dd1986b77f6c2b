// ABOUTME: Timing configuration for background sync, feed calls, and edit debouncing
// ABOUTME: Stored as integer seconds/milliseconds with Duration accessors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use energy_core::constants::timing;
use energy_feed::CircuitBreakerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Background sync timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Periodic tick interval (seconds)
    pub interval_secs: u64,
    /// How long succeeded/failed stays visible before resetting to idle (ms)
    pub status_reset_ms: u64,
}

impl SyncConfig {
    /// Tick interval
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Terminal status display window
    #[must_use]
    pub const fn status_reset(&self) -> Duration {
        Duration::from_millis(self.status_reset_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: timing::SYNC_INTERVAL_SECS,
            status_reset_ms: timing::STATUS_RESET_MS,
        }
    }
}

/// External feed call policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Per-call timeout (ms)
    pub timeout_ms: u64,
    /// Consecutive retryable failures before the circuit opens
    pub failure_threshold: u32,
    /// Seconds before an open circuit admits a probe
    pub recovery_timeout_secs: u64,
    /// Half-open successes required to close the circuit
    pub success_threshold: u32,
}

impl FeedConfig {
    /// Per-call timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Circuit breaker settings
    #[must_use]
    pub const fn circuit_breaker(&self) -> CircuitBreakerConfig {
        CircuitBreakerConfig::new(
            self.failure_threshold,
            Duration::from_secs(self.recovery_timeout_secs),
            self.success_threshold,
        )
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        let breaker = CircuitBreakerConfig::default();
        Self {
            timeout_ms: timing::FEED_TIMEOUT_MS,
            failure_threshold: breaker.failure_threshold,
            recovery_timeout_secs: breaker.recovery_timeout.as_secs(),
            success_threshold: breaker.success_threshold,
        }
    }
}

/// Quiescence windows for edit debouncing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Goal parameter edits (ms)
    pub goal_edit_ms: u64,
    /// Weight edits (ms)
    pub weight_edit_ms: u64,
}

impl DebounceConfig {
    /// Goal parameter quiescence window
    #[must_use]
    pub const fn goal_edit(&self) -> Duration {
        Duration::from_millis(self.goal_edit_ms)
    }

    /// Weight quiescence window
    #[must_use]
    pub const fn weight_edit(&self) -> Duration {
        Duration::from_millis(self.weight_edit_ms)
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            goal_edit_ms: timing::GOAL_EDIT_DEBOUNCE_MS,
            weight_edit_ms: timing::WEIGHT_EDIT_DEBOUNCE_MS,
        }
    }
}
