// ABOUTME: Single-writer observable value built on a tokio watch channel
// ABOUTME: Subscribers always see the latest value after any completed publish
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tokio::sync::watch;

/// Latest-value observable
///
/// Intermediate values may be skipped by slow subscribers; the latest one is
/// never lost.
#[derive(Debug)]
pub struct Observable<T> {
    sender: watch::Sender<T>,
}

impl<T: Clone> Observable<T> {
    /// Observable holding `initial`
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Replace the current value and wake subscribers
    pub fn publish(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Clone of the current value
    #[must_use]
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// New subscriber positioned at the current value
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }

    /// Update in place; subscribers are woken only when `modify` returns `true`
    pub fn update(&self, modify: impl FnOnce(&mut T) -> bool) -> bool {
        self.sender.send_if_modified(modify)
    }
}
