// ABOUTME: Injectable wall clock used for goal date validation and sync timestamps
// ABOUTME: SystemClock reads the host clock, FixedClock pins time for deterministic tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Local, NaiveDate, Utc};
use std::sync::RwLock;

/// Source of the current instant and the user's calendar day
pub trait Clock: Send + Sync {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;

    /// The user's current calendar day
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the host system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a fixed instant, adjustable between assertions
#[derive(Debug)]
pub struct FixedClock {
    instant: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock frozen at `instant`
    #[must_use]
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: RwLock::new(instant),
        }
    }

    /// Create a clock frozen at midday UTC of `date`
    #[must_use]
    pub fn on_date(date: NaiveDate) -> Self {
        let instant = date
            .and_hms_opt(12, 0, 0)
            .map_or_else(Utc::now, |naive| naive.and_utc());
        Self::new(instant)
    }

    /// Move the clock to a new instant
    pub fn set(&self, instant: DateTime<Utc>) {
        if let Ok(mut guard) = self.instant.write() {
            *guard = instant;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant.read().map_or_else(|_| Utc::now(), |guard| *guard)
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
