// ABOUTME: Error types for the external health-data feed
// ABOUTME: Authorization, timeout, availability, and data-shape failures with retry classification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// Failures raised while talking to the external health feed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// A fetch was attempted before authorization succeeded
    #[error("Feed '{provider}' is not authorized")]
    NotAuthorized {
        /// Feed name
        provider: String,
    },

    /// The user declined access to the requested data types
    #[error("Authorization denied by feed '{provider}'")]
    AuthorizationDenied {
        /// Feed name
        provider: String,
    },

    /// A query did not complete within the configured timeout
    #[error("Feed operation '{operation}' timed out after {timeout_ms}ms")]
    Timeout {
        /// Operation that timed out
        operation: String,
        /// Timeout that elapsed
        timeout_ms: u64,
    },

    /// The circuit breaker is rejecting calls
    #[error("Circuit open for feed '{provider}', retry after {retry_after_secs}s")]
    CircuitOpen {
        /// Feed name
        provider: String,
        /// Seconds until a probe call is allowed
        retry_after_secs: u64,
    },

    /// The feed could not be reached or reported an internal failure
    #[error("Feed '{provider}' unavailable: {reason}")]
    Unavailable {
        /// Feed name
        provider: String,
        /// Failure description
        reason: String,
    },

    /// The feed answered with a value outside the plausible domain
    #[error("Invalid data from feed for '{field}': {reason}")]
    InvalidData {
        /// Offending quantity
        field: String,
        /// Why it was rejected
        reason: String,
    },
}

impl FeedError {
    /// Whether this failure should count against the circuit breaker
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Unavailable { .. })
    }

    /// Whether this is an authorization problem the user can resolve
    #[must_use]
    pub const fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotAuthorized { .. } | Self::AuthorizationDenied { .. }
        )
    }

    /// Convenience constructor for unavailable
    pub fn unavailable(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            provider: provider.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for feed operations
pub type FeedResult<T> = Result<T, FeedError>;
