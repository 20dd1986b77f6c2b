// ABOUTME: Energy data resolution between the external feed and calculated fallback
// ABOUTME: Re-exports the energy source arbiter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// All-or-nothing source selection for daily energy samples
pub mod arbiter;

pub use arbiter::{EnergySourceArbiter, Resolution};
