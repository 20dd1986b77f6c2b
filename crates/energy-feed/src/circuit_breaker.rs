// ABOUTME: Circuit breaker guarding calls to the external health feed
// ABOUTME: Fails fast to the calculated fallback while the feed keeps failing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use energy_core::{FeedError, FeedResult};
use std::future::Future;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation - requests pass through
    Closed,
    /// Circuit is open - requests fail immediately
    Open,
    /// Testing recovery - probe requests pass through
    HalfOpen,
}

impl CircuitState {
    const fn from_u32(value: u32) -> Self {
        match value {
            0 => Self::Closed,
            1 => Self::Open,
            _ => Self::HalfOpen,
        }
    }

    const fn to_u32(self) -> u32 {
        match self {
            Self::Closed => 0,
            Self::Open => 1,
            Self::HalfOpen => 2,
        }
    }
}

/// Configuration for circuit breaker behavior
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Number of consecutive retryable failures before opening the circuit
    pub failure_threshold: u32,
    /// Duration to wait before probing the feed again
    pub recovery_timeout: Duration,
    /// Consecutive half-open successes required to close the circuit
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(30),
            success_threshold: 2,
        }
    }
}

impl CircuitBreakerConfig {
    /// Create a new circuit breaker configuration
    #[must_use]
    pub const fn new(
        failure_threshold: u32,
        recovery_timeout: Duration,
        success_threshold: u32,
    ) -> Self {
        Self {
            failure_threshold,
            recovery_timeout,
            success_threshold,
        }
    }

    /// Stricter configuration for unreliable feeds
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            failure_threshold: 3,
            recovery_timeout: Duration::from_secs(60),
            success_threshold: 3,
        }
    }

    /// Lenient configuration for on-device stores that rarely fail
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            failure_threshold: 10,
            recovery_timeout: Duration::from_secs(15),
            success_threshold: 1,
        }
    }
}

/// Thread-safe circuit breaker for feed calls
///
/// - **Closed**: calls pass through, consecutive retryable failures are counted.
/// - **Open**: calls fail immediately with `FeedError::CircuitOpen`.
/// - **Half-Open**: after the recovery timeout, calls pass through as probes. Enough
///   successes close the circuit; any retryable failure re-opens it.
///
/// Elapsed time is measured with `tokio::time::Instant`, so paused-clock tests can
/// advance through the recovery timeout.
pub struct CircuitBreaker {
    feed_name: String,
    state: AtomicU32,
    failure_count: AtomicU32,
    success_count: AtomicU32,
    /// Millis since `start_instant` when the circuit last opened
    last_failure_time: AtomicU64,
    config: CircuitBreakerConfig,
    start_instant: Instant,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with default configuration
    #[must_use]
    pub fn new(feed_name: &str) -> Self {
        Self::with_config(feed_name, CircuitBreakerConfig::default())
    }

    /// Create a new circuit breaker with custom configuration
    #[must_use]
    pub fn with_config(feed_name: &str, config: CircuitBreakerConfig) -> Self {
        Self {
            feed_name: feed_name.to_owned(),
            state: AtomicU32::new(CircuitState::Closed.to_u32()),
            failure_count: AtomicU32::new(0),
            success_count: AtomicU32::new(0),
            last_failure_time: AtomicU64::new(0),
            config,
            start_instant: Instant::now(),
        }
    }

    /// Get current circuit state
    #[must_use]
    pub fn state(&self) -> CircuitState {
        CircuitState::from_u32(self.state.load(Ordering::SeqCst))
    }

    /// Get current consecutive failure count
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.failure_count.load(Ordering::SeqCst)
    }

    /// Check if the circuit allows a call, moving Open to Half-Open once the timeout elapsed
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        match self.state() {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => self.should_attempt_recovery(),
        }
    }

    fn should_attempt_recovery(&self) -> bool {
        if self.millis_since_open() < self.recovery_millis() {
            return false;
        }

        let transitioned = self
            .state
            .compare_exchange(
                CircuitState::Open.to_u32(),
                CircuitState::HalfOpen.to_u32(),
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok();
        if transitioned {
            info!(
                feed = %self.feed_name,
                "Circuit breaker transitioning to half-open state for recovery test"
            );
        }
        // Another caller may have won the race; half-open admits probes either way
        self.state() != CircuitState::Open
    }

    fn elapsed_millis(&self) -> u64 {
        self.start_instant.elapsed().as_millis() as u64
    }

    fn recovery_millis(&self) -> u64 {
        self.config.recovery_timeout.as_millis() as u64
    }

    fn millis_since_open(&self) -> u64 {
        self.elapsed_millis()
            .saturating_sub(self.last_failure_time.load(Ordering::SeqCst))
    }

    fn open(&self) {
        self.state
            .store(CircuitState::Open.to_u32(), Ordering::SeqCst);
        self.last_failure_time
            .store(self.elapsed_millis(), Ordering::SeqCst);
        self.success_count.store(0, Ordering::SeqCst);
    }

    /// Record a successful call
    pub fn record_success(&self) {
        match self.state() {
            CircuitState::Closed => {
                self.failure_count.store(0, Ordering::SeqCst);
            }
            CircuitState::HalfOpen => {
                let count = self.success_count.fetch_add(1, Ordering::SeqCst) + 1;
                if count >= self.config.success_threshold {
                    self.state
                        .store(CircuitState::Closed.to_u32(), Ordering::SeqCst);
                    self.failure_count.store(0, Ordering::SeqCst);
                    self.success_count.store(0, Ordering::SeqCst);
                    info!(feed = %self.feed_name, "Circuit breaker closed - feed recovered");
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Record a retryable failure
    pub fn record_failure(&self) {
        match self.state() {
            CircuitState::Closed => {
                let count = self.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
                if count >= self.config.failure_threshold {
                    self.open();
                    warn!(
                        feed = %self.feed_name,
                        failures = count,
                        threshold = self.config.failure_threshold,
                        recovery_timeout_secs = self.config.recovery_timeout.as_secs(),
                        "Circuit breaker opened - feed failing"
                    );
                }
            }
            CircuitState::HalfOpen => {
                self.open();
                warn!(
                    feed = %self.feed_name,
                    "Circuit breaker re-opened - recovery test failed"
                );
            }
            CircuitState::Open => {
                self.last_failure_time
                    .store(self.elapsed_millis(), Ordering::SeqCst);
            }
        }
    }

    /// Execute a feed call with circuit breaker protection
    ///
    /// # Errors
    ///
    /// Returns `FeedError::CircuitOpen` if the circuit is open and the recovery
    /// timeout hasn't elapsed. Otherwise returns the result of the wrapped call.
    pub async fn call<F, T>(&self, operation: F) -> FeedResult<T>
    where
        F: Future<Output = FeedResult<T>>,
    {
        if !self.is_allowed() {
            return Err(FeedError::CircuitOpen {
                provider: self.feed_name.clone(),
                retry_after_secs: self.time_until_recovery(),
            });
        }

        match operation.await {
            Ok(result) => {
                self.record_success();
                Ok(result)
            }
            Err(error) => {
                // Only transient failures count against the feed
                if error.is_retryable() {
                    self.record_failure();
                }
                Err(error)
            }
        }
    }

    /// Seconds until a probe is allowed, rounded up
    #[must_use]
    pub fn time_until_recovery(&self) -> u64 {
        self.recovery_millis()
            .saturating_sub(self.millis_since_open())
            .saturating_add(999)
            / 1000
    }

    /// Force reset the circuit breaker to closed state
    pub fn reset(&self) {
        self.state
            .store(CircuitState::Closed.to_u32(), Ordering::SeqCst);
        self.failure_count.store(0, Ordering::SeqCst);
        self.success_count.store(0, Ordering::SeqCst);
        info!(
            feed = %self.feed_name,
            "Circuit breaker manually reset to closed state"
        );
    }
}
