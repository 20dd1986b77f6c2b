// ABOUTME: Background sync status reported to the presentation layer
// ABOUTME: idle -> syncing -> succeeded|failed -> idle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, ErrorCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Failure detail carried by `SyncStatus::Failed`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncFailure {
    /// Stable error code
    pub code: ErrorCode,
    /// Message for the error banner
    pub message: String,
    /// When the sync failed
    pub at: DateTime<Utc>,
}

impl SyncFailure {
    /// Capture an error for display
    #[must_use]
    pub fn from_error(error: &AppError, at: DateTime<Utc>) -> Self {
        Self {
            code: error.code,
            message: error.user_message(),
            at,
        }
    }
}

/// Background sync state
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncStatus {
    /// Nothing in progress
    #[default]
    Idle,
    /// A sync is running
    Syncing,
    /// Last sync completed at the given instant
    Succeeded {
        /// Completion time
        at: DateTime<Utc>,
    },
    /// Last sync failed
    Failed(SyncFailure),
}

impl SyncStatus {
    /// Succeeded or failed
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed(_))
    }

    /// Stable label for logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Syncing => "syncing",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

/// What caused a sync
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncTrigger {
    /// Periodic tick
    Tick,
    /// Change notification from the health feed
    FeedChange,
    /// App returned to the foreground
    Foreground,
    /// User pulled to refresh
    Manual,
}

impl SyncTrigger {
    /// Stable label for logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tick => "tick",
            Self::FeedChange => "feed_change",
            Self::Foreground => "foreground",
            Self::Manual => "manual",
        }
    }
}
