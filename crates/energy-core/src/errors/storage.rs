// ABOUTME: Error types raised by the persistence collaborator
// ABOUTME: Not-found, read, write, and serialization failures surfaced to callers as-is
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// Persistence failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Record does not exist
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// Record kind
        entity: &'static str,
        /// Record identifier
        id: String,
    },

    /// Record with the same identifier already exists
    #[error("{entity} '{id}' already exists")]
    AlreadyExists {
        /// Record kind
        entity: &'static str,
        /// Record identifier
        id: String,
    },

    /// Read from the store failed
    #[error("Failed to read {entity}: {reason}")]
    ReadFailed {
        /// Record kind
        entity: &'static str,
        /// Failure description
        reason: String,
    },

    /// Write to the store failed
    #[error("Failed to write {entity}: {reason}")]
    WriteFailed {
        /// Record kind
        entity: &'static str,
        /// Failure description
        reason: String,
    },

    /// Record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    /// Convenience constructor for write failures
    pub fn write_failed(entity: &'static str, reason: impl Into<String>) -> Self {
        Self::WriteFailed {
            entity,
            reason: reason.into(),
        }
    }

    /// Convenience constructor for read failures
    pub fn read_failed(entity: &'static str, reason: impl Into<String>) -> Self {
        Self::ReadFailed {
            entity,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Result alias for persistence operations
pub type StorageResult<T> = Result<T, StorageError>;
