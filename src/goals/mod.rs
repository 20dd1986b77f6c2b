// ABOUTME: Goal lifecycle and debounced goal editing
// ABOUTME: Re-exports the goal service, edit debouncer, and save events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Debounced goal and weight edits
pub mod debouncer;
/// Create, update, reset and recalculate the active goal
pub mod service;

pub use debouncer::{DebounceTimer, GoalEdit, GoalEditDebouncer, GoalSaveEvent};
pub use service::GoalService;
