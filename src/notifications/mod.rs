// ABOUTME: Publish/subscribe primitives exposed to the presentation layer
// ABOUTME: Latest-value observables and broadcast event streams
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Broadcast stream of discrete events
pub mod events;
/// Single-writer latest-value observable
pub mod observable;

pub use events::EventStream;
pub use observable::Observable;
