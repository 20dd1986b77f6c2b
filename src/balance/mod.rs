// ABOUTME: Calorie balance composition for the tracked day
// ABOUTME: Re-exports the balance tracker and its observable current balance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Tracker publishing consumed-minus-expended balance
pub mod tracker;

pub use tracker::BalanceTracker;
