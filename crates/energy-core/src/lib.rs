// ABOUTME: Core types and constants for the energy balance engine
// ABOUTME: Foundation crate with error handling, domain models, constants, and clocks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Energy Core
//!
//! Foundation crate providing shared types and constants for the energy balance
//! engine. This crate is designed to change infrequently, enabling incremental
//! compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: `AppError`/`ErrorCode` envelope plus the typed `BalanceError`,
//!   `FeedError` and `StorageError` domain errors
//! - **constants**: Physiological constants and safety bounds
//! - **models**: Profile, goal, food entry, daily nutrition, energy and sync models
//! - **clock**: Injectable source of "today" and "now"

/// Unified error handling system with standard error codes
pub mod errors;

/// Physiological constants and safety bounds organized by domain
pub mod constants;

/// Core data models (profile, goal, food entries, energy samples, balance)
pub mod models;

/// Injectable wall clock
pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{
    AppError, AppResult, BalanceError, BalanceResult, ErrorCode, FeedError, FeedResult,
    GoalParameterError, StorageError, StorageResult,
};
