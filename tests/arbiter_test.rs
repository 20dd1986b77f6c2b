// ABOUTME: Integration tests for energy source arbitration
// ABOUTME: Wholesale external samples, calculated fallback, timeouts, authorization, and the circuit breaker
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use energy_core::models::{ActivityLevel, EnergySource};
use energy_core::{BalanceError, FeedError};
use energy_feed::SyntheticHealthFeed;
use std::time::Duration;

#[tokio::test]
async fn test_external_sample_is_never_mixed() {
    let t = common::engine_with_feed(SyntheticHealthFeed::new(1700.0, 640.0, None));
    let resolution = t.engine.energy_for_date(common::test_date()).await.unwrap();

    let sample = resolution.sample;
    assert_eq!(sample.source, EnergySource::External);
    assert!((sample.resting_energy_kcal - 1700.0).abs() < f64::EPSILON);
    assert!((sample.active_energy_kcal - 640.0).abs() < f64::EPSILON);
    assert_eq!(sample.weight_kg, None);
}

#[tokio::test]
async fn test_calculated_sample_is_fully_calculated() {
    let t = common::engine_with_feed(SyntheticHealthFeed::new(0.0, 640.0, Some(70.0)));
    let sample = t
        .engine
        .energy_for_date(common::test_date())
        .await
        .unwrap()
        .sample;

    assert_eq!(sample.source, EnergySource::Calculated);
    assert!((sample.resting_energy_kcal - 1780.0).abs() < f64::EPSILON);
    assert!((sample.active_energy_kcal - 356.0).abs() < 1e-9);
    assert_eq!(sample.weight_kg, Some(80.0));
}

#[tokio::test]
async fn test_no_feed_uses_profile() {
    let t = common::build_engine(
        Some(common::reference_female(ActivityLevel::Sedentary)),
        None,
    );
    let resolution = t.engine.energy_for_date(common::test_date()).await.unwrap();

    assert_eq!(resolution.sample.source, EnergySource::Calculated);
    assert!((resolution.sample.resting_energy_kcal - 1320.25).abs() < 1e-9);
    assert!(resolution.feed_error.is_none());
}

#[tokio::test]
async fn test_external_feed_works_without_profile() {
    let t = common::build_engine(None, Some(SyntheticHealthFeed::default()));
    let resolution = t.engine.energy_for_date(common::test_date()).await.unwrap();
    assert_eq!(resolution.sample.source, EnergySource::External);
}

#[tokio::test]
async fn test_feed_failure_without_profile_needs_user() {
    let t = common::build_engine(None, Some(SyntheticHealthFeed::default()));
    t.feed
        .as_ref()
        .unwrap()
        .fail_with(Some(FeedError::unavailable("synthetic", "offline")));

    let result = t.engine.energy_for_date(common::test_date()).await;
    assert!(matches!(result, Err(BalanceError::UserNotFound)));
}

#[tokio::test]
async fn test_authorization_requested_once() {
    let t = common::engine_with_feed(SyntheticHealthFeed::default());
    let feed = t.feed.clone().unwrap();

    for _ in 0..3 {
        t.engine.energy_for_date(common::test_date()).await.unwrap();
    }
    assert_eq!(feed.authorization_requests(), 1);
    assert_eq!(feed.fetch_count(), 9);
}

#[tokio::test]
async fn test_denied_authorization_falls_back() {
    let feed = SyntheticHealthFeed::default();
    feed.deny_authorization();
    let t = common::engine_with_feed(feed);

    let resolution = t.engine.energy_for_date(common::test_date()).await.unwrap();
    assert_eq!(resolution.sample.source, EnergySource::Calculated);
    assert!(matches!(
        resolution.feed_error,
        Some(FeedError::AuthorizationDenied { .. })
    ));
    assert_eq!(t.feed.as_ref().unwrap().fetch_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_feed_times_out_to_fallback() {
    let feed = SyntheticHealthFeed::default();
    feed.set_latency(Some(Duration::from_secs(2)));
    let t = common::engine_with_feed(feed);
    // Authorize while the feed is fast enough
    t.engine.energy_for_date(common::test_date()).await.unwrap();

    t.feed
        .as_ref()
        .unwrap()
        .set_latency(Some(Duration::from_secs(60)));
    let resolution = t.engine.energy_for_date(common::test_date()).await.unwrap();

    assert_eq!(resolution.sample.source, EnergySource::Calculated);
    assert!(matches!(
        resolution.feed_error,
        Some(FeedError::Timeout { timeout_ms: 10_000, .. })
    ));
}

#[tokio::test]
async fn test_circuit_opens_and_skips_feed() {
    let t = common::engine_with_feed(SyntheticHealthFeed::default());
    let feed = t.feed.clone().unwrap();
    feed.fail_with(Some(FeedError::unavailable("synthetic", "offline")));

    for _ in 0..5 {
        let resolution = t.engine.energy_for_date(common::test_date()).await.unwrap();
        assert!(matches!(
            resolution.feed_error,
            Some(FeedError::Unavailable { .. })
        ));
    }
    let calls_before = feed.fetch_count();

    let resolution = t.engine.energy_for_date(common::test_date()).await.unwrap();
    assert!(matches!(
        resolution.feed_error,
        Some(FeedError::CircuitOpen { .. })
    ));
    assert_eq!(resolution.sample.source, EnergySource::Calculated);
    assert_eq!(feed.fetch_count(), calls_before);
}

#[tokio::test]
async fn test_per_date_feed_values() {
    let t = common::engine_with_feed(SyntheticHealthFeed::default());
    let yesterday = common::test_date().pred_opt().unwrap();
    t.feed
        .as_ref()
        .unwrap()
        .set_energy_for(yesterday, 1590.0, 210.0);

    let balance = t.engine.balance_for_date(yesterday).await.unwrap();
    assert!(balance.is_from_external_feed);
    assert!((balance.total_energy_expended - 1800.0).abs() < f64::EPSILON);
}
