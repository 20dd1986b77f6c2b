// ABOUTME: HealthFeed trait implemented by every external health-data source
// ABOUTME: Energy and weight queries, authorization, and a change subscription
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::NaiveDate;
use energy_core::FeedResult;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Kind of data that changed in the feed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeedChange {
    /// Active or resting energy samples were written
    Energy,
    /// A new body weight was recorded
    Weight,
    /// A workout was recorded
    Workout,
}

/// External health-data source
///
/// Every fetch requires a prior successful [`HealthFeed::request_authorization`].
/// Implementations return `FeedError::NotAuthorized` otherwise.
#[async_trait]
pub trait HealthFeed: Send + Sync {
    /// Feed name for logging and error messages
    fn name(&self) -> &'static str;

    /// Ask the user for read access to energy, weight and workout data
    async fn request_authorization(&self) -> FeedResult<()>;

    /// Whether read access has been granted
    async fn is_authorized(&self) -> bool;

    /// Active energy burned on `date` (kcal)
    async fn fetch_active_energy(&self, date: NaiveDate) -> FeedResult<f64>;

    /// Resting energy burned on `date` (kcal)
    async fn fetch_resting_energy(&self, date: NaiveDate) -> FeedResult<f64>;

    /// Most recent body weight (kg), if any was recorded
    async fn fetch_weight(&self) -> FeedResult<Option<f64>>;

    /// Subscribe to change notifications
    fn subscribe(&self) -> broadcast::Receiver<FeedChange>;
}
