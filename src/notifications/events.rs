// ABOUTME: Broadcast event stream for discrete engine events such as goal saves
// ABOUTME: Every subscriber receives every event published after it subscribed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use energy_core::constants::timing;
use tokio::sync::broadcast;
use tracing::trace;

/// Broadcast stream of events
#[derive(Debug)]
pub struct EventStream<T> {
    sender: broadcast::Sender<T>,
}

impl<T: Clone> EventStream<T> {
    /// Stream with the default buffer size
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(timing::EVENT_CHANNEL_CAPACITY)
    }

    /// Stream buffering up to `capacity` events per slow subscriber
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event; returns the number of subscribers reached
    pub fn publish(&self, event: T) -> usize {
        self.sender.send(event).unwrap_or_else(|_| {
            trace!("Event published with no subscribers");
            0
        })
    }

    /// Subscribe to events published from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.sender.subscribe()
    }
}

impl<T: Clone> Default for EventStream<T> {
    fn default() -> Self {
        Self::new()
    }
}
