// ABOUTME: Background synchronization of the calorie balance
// ABOUTME: Re-exports the sync controller and its status stream
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Periodic, change-driven and manual sync with a published status
pub mod controller;

pub use controller::SyncController;
