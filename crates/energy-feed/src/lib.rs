// ABOUTME: Health data feed abstraction for the energy balance engine
// ABOUTME: HealthFeed trait, guarded feed client with circuit breaker, and a synthetic feed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Energy Feed
//!
//! The engine talks to wearable and phone health stores through the [`HealthFeed`]
//! trait. [`FeedClient`] wraps any feed with the authorization gate, a per-call
//! timeout and a [`CircuitBreaker`], so a flaky source fails fast instead of
//! stalling every sync tick.

/// Circuit breaker guarding feed calls
pub mod circuit_breaker;
/// Guarded client combining authorization, timeout and circuit breaker
pub mod client;
/// Feed trait and change notifications
pub mod source;
/// Configurable in-process feed for development and tests
pub mod synthetic;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use client::{FeedClient, FeedReading};
pub use source::{FeedChange, HealthFeed};
pub use synthetic::SyntheticHealthFeed;
