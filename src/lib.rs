// ABOUTME: Main library entry point for the real-time energy balance engine
// ABOUTME: Reconciles nutrition targets, logged food, and measured or calculated energy expenditure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Energy Balance Engine
//!
//! Keeps a user's daily calorie balance current as food is logged, goals are
//! edited, and the health feed reports new activity.
//!
//! ## Components
//!
//! - **Target calculator**: resting energy, daily need, and goal-derived calorie,
//!   protein and water targets
//! - **Energy source arbiter**: one authoritative energy sample per day, either
//!   wholly from the health feed or wholly calculated
//! - **Nutrition ledger**: date-scoped food entries with totals that always match
//! - **Balance tracker**: consumed minus expended for the tracked day
//! - **Sync controller**: periodic, change-driven and manual refresh with status
//! - **Goal edit debouncer**: coalesces rapid goal and weight edits into one save
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use energy_balance::config::EngineConfig;
//! use energy_balance::engine::EnergyBalanceEngine;
//! use energy_balance::persistence::InMemoryStore;
//! use energy_core::models::{ActivityLevel, Sex, UserProfile};
//! use energy_core::SystemClock;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = EngineConfig::load()?;
//!     let profile = UserProfile::new(30, 80.0, 180.0, Sex::Male, ActivityLevel::ModeratelyActive);
//!     let store = Arc::new(InMemoryStore::with_user(profile));
//!
//!     let engine = EnergyBalanceEngine::new(config, store, None, Arc::new(SystemClock))?;
//!     let balance = engine.manual_refresh().await?;
//!     println!("Balance today: {:.0} kcal", balance.balance);
//!     Ok(())
//! }
//! ```

/// Calorie balance for the tracked day
pub mod balance;

/// Environment-driven engine configuration
pub mod config;

/// Source arbitration between the health feed and calculated energy
pub mod energy;

/// Engine facade wiring every component together
pub mod engine;

/// Goal lifecycle and debounced editing
pub mod goals;

/// Target calculation
pub mod intelligence;

/// Logging configuration and structured engine events
pub mod logging;

/// Observable values and event streams
pub mod notifications;

/// Date-scoped nutrition ledgers
pub mod nutrition;

/// Persistence interface and in-memory store
pub mod persistence;

/// Background sync
pub mod sync;

pub use engine::EnergyBalanceEngine;
pub use energy_core::{errors, models};
