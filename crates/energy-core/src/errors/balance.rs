// ABOUTME: Typed errors returned by the target calculator, aggregator, arbiter and sync paths
// ABOUTME: Converts into the AppError envelope for user-facing messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode, FeedError, StorageError};
use chrono::NaiveDate;
use thiserror::Error;

/// Goal parameters outside the safety bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GoalParameterError {
    /// Weekly rate outside the range allowed for the goal type
    #[error("Weekly rate {rate} kg/week for {goal_type} must be between {min} and {max}")]
    UnsafeWeightChangeRate {
        /// Goal type label
        goal_type: &'static str,
        /// Requested rate
        rate: f64,
        /// Lowest allowed rate
        min: f64,
        /// Highest allowed rate
        max: f64,
    },

    /// Target weight not strictly between 0 and the upper bound
    #[error("Target weight {value} kg must be between 0 and {max} kg (exclusive)")]
    InvalidTargetWeight {
        /// Requested target weight
        value: f64,
        /// Exclusive upper bound
        max: f64,
    },

    /// Target date not strictly in the future
    #[error("Target date {date} must be after {today}")]
    InvalidTargetDate {
        /// Requested date
        date: NaiveDate,
        /// Current calendar day
        today: NaiveDate,
    },
}

/// Errors produced by engine operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BalanceError {
    /// A field is out of bounds; nothing was mutated
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// Offending field
        field: &'static str,
        /// Which bound was violated
        reason: String,
    },

    /// Age, weight or height outside the resting energy formula's domain
    #[error("Invalid {metric}: {value} is outside the supported range")]
    InvalidBodyMetric {
        /// Offending metric
        metric: &'static str,
        /// Supplied value
        value: f64,
    },

    /// Goal parameters outside safety bounds
    #[error("Unsafe goal parameter: {0}")]
    UnsafeGoalParameter(#[from] GoalParameterError),

    /// A profile is required but none exists
    #[error("No user profile found")]
    UserNotFound,

    /// External feed failure surfaced by a manual refresh
    #[error("External feed failure: {0}")]
    ExternalFeedFailure(#[from] FeedError),

    /// Persistence collaborator failure
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] StorageError),
}

impl BalanceError {
    /// Convenience constructor for validation failures
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Error code used in the user-facing envelope
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValueOutOfRange,
            Self::InvalidBodyMetric { .. } => ErrorCode::InvalidBodyMetric,
            Self::UnsafeGoalParameter(_) => ErrorCode::UnsafeGoalParameter,
            Self::UserNotFound => ErrorCode::UserNotFound,
            Self::ExternalFeedFailure(feed) => match feed {
                FeedError::NotAuthorized { .. } | FeedError::AuthorizationDenied { .. } => {
                    ErrorCode::ExternalAuthFailed
                }
                FeedError::Timeout { .. } => ErrorCode::ExternalTimeout,
                FeedError::CircuitOpen { .. } | FeedError::Unavailable { .. } => {
                    ErrorCode::ExternalServiceUnavailable
                }
                FeedError::InvalidData { .. } => ErrorCode::ExternalServiceError,
            },
            Self::StorageFailure(StorageError::NotFound { .. }) => ErrorCode::ResourceNotFound,
            Self::StorageFailure(StorageError::Serialization(_)) => ErrorCode::SerializationError,
            Self::StorageFailure(_) => ErrorCode::StorageError,
        }
    }
}

impl From<BalanceError> for AppError {
    fn from(error: BalanceError) -> Self {
        let details = match &error {
            BalanceError::Validation { field, .. } => serde_json::json!({ "field": field }),
            BalanceError::InvalidBodyMetric { metric, value } => {
                serde_json::json!({ "metric": metric, "value": value })
            }
            _ => serde_json::Value::Object(serde_json::Map::new()),
        };
        Self::new(error.code(), error.to_string())
            .with_details(details)
            .with_source(error)
    }
}

/// Result alias for engine operations
pub type BalanceResult<T> = Result<T, BalanceError>;
