// ABOUTME: Nutrition aggregation over date-scoped food entry ledgers
// ABOUTME: Re-exports the ledger that owns each day's in-memory aggregate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Per-day ledger with persist-then-commit mutations
pub mod ledger;

pub use ledger::NutritionLedger;
