// ABOUTME: Unified error envelope with standard error codes and user-facing messages
// ABOUTME: Re-exports the typed balance, feed, and storage errors used by every component
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Core operations return the typed [`BalanceError`]. Anything that has to be shown
//! to a person (sync banner, goal-save failure) is converted into an [`AppError`],
//! which pairs a stable [`ErrorCode`] with a readable message.

/// Typed errors for the balance engine operations
pub mod balance;
/// External health feed errors
pub mod feed;
/// Persistence collaborator errors
pub mod storage;

pub use balance::{BalanceError, BalanceResult, GoalParameterError};
pub use feed::{FeedError, FeedResult};
pub use storage::{StorageError, StorageResult};

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Generic invalid input
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// Field outside its allowed range
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 3003,
    /// Age, weight or height outside the formula's domain
    #[serde(rename = "INVALID_BODY_METRIC")]
    InvalidBodyMetric = 3010,
    /// Weekly rate, target weight or target date outside safety bounds
    #[serde(rename = "UNSAFE_GOAL_PARAMETER")]
    UnsafeGoalParameter = 3011,

    // Resource Management (4000-4999)
    /// Requested record does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    /// No user profile exists yet
    #[serde(rename = "USER_NOT_FOUND")]
    UserNotFound = 4004,

    // External Services (5000-5999)
    /// External feed returned an error
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// External feed unreachable or circuit open
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    /// External feed authorization missing or denied
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,
    /// External feed did not answer in time
    #[serde(rename = "EXTERNAL_TIMEOUT")]
    ExternalTimeout = 5004,

    // Configuration (6000-6999)
    /// Configuration could not be loaded
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Persistence collaborator failed
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 9002,
    /// Data serialization/deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::InvalidBodyMetric => "Age, weight or height is outside the supported range",
            Self::UnsafeGoalParameter => "The goal settings are outside safe limits",
            Self::ResourceNotFound => "The requested record was not found",
            Self::UserNotFound => "Set up your profile to calculate targets",
            Self::ExternalServiceError => "The health data source reported an error",
            Self::ExternalServiceUnavailable => "The health data source is currently unavailable",
            Self::ExternalAuthFailed => "Access to health data has not been granted",
            Self::ExternalTimeout => "The health data source did not respond in time",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal error occurred",
            Self::StorageError => "Your data could not be saved or loaded",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Whether the user can fix the problem by changing their input
    #[must_use]
    pub const fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput
                | Self::ValueOutOfRange
                | Self::InvalidBodyMetric
                | Self::UnsafeGoalParameter
                | Self::UserNotFound
                | Self::ExternalAuthFailed
        )
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Identifier of the record involved, if any
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            resource_id: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// User-facing error envelope
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Message suitable for a banner or alert
    #[must_use]
    pub fn user_message(&self) -> String {
        format!("{}. {}", self.code.description(), self.message)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Serializable error payload for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error code
    pub code: ErrorCode,
    /// Message to display
    pub message: String,
    /// Whether changing the input can resolve it
    pub user_correctable: bool,
    /// Extra structured context
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            code: error.code,
            message: error.user_message(),
            user_correctable: error.code.is_user_correctable(),
            details: error.context.details.clone(),
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_includes_description() {
        let error = AppError::invalid_input("calories must be at most 10000");
        assert!(error.user_message().starts_with("The provided input is invalid"));
        assert!(error.user_message().contains("calories"));
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::not_found("Food entry").with_resource_id("abc");
        let response = ErrorResponse::from(error);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("RESOURCE_NOT_FOUND"));
        assert!(!response.user_correctable);
    }
}
