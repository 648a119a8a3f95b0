//! Circuit breaker for dependency protection.
//!
//! # States
//! - Closed: failure streak below threshold, calls pass through
//! - Open: threshold reached, retry delay not yet elapsed, calls fail fast
//! - Half-Open: threshold reached, retry delay elapsed, next call probes
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive_failures reaches failure_threshold
//! Open → Half-Open: now > last_attempt + 2s * 2^(failures - threshold)
//! Half-Open → Closed: probe succeeds (counter resets)
//! Half-Open → Open: probe fails (counter grows, delay doubles)
//! ```
//!
//! # Design Decisions
//! - States are derived from the counter and timestamp at call time
//! - Rejected calls leave the counter and timestamp untouched
//! - Concurrent probes are possible when the gate is borderline open

use async_trait::async_trait;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::time::Instant;

use crate::circuit::{Circuit, CircuitError, CircuitResult, Context};
use crate::observability::metrics;
use crate::resilience::backoff;

/// Breaker state as observed at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
struct Counters {
    consecutive_failures: u32,
    last_attempt: Instant,
}

/// Wraps a circuit and stops calling it after repeated failures.
pub struct CircuitBreaker<C> {
    inner: C,
    name: String,
    failure_threshold: u32,
    counters: RwLock<Counters>,
}

impl<C: Circuit> CircuitBreaker<C> {
    /// Create a breaker that trips after `failure_threshold` consecutive
    /// failures. The retry clock starts now.
    pub fn new(inner: C, failure_threshold: u32) -> Self {
        Self {
            inner,
            name: "circuit".to_string(),
            failure_threshold,
            counters: RwLock::new(Counters {
                consecutive_failures: 0,
                last_attempt: Instant::now(),
            }),
        }
    }

    /// Label used in logs and metrics.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.read().consecutive_failures
    }

    /// When the wrapped circuit was last called (construction time before
    /// the first call).
    pub fn last_attempt(&self) -> Instant {
        self.read().last_attempt
    }

    /// Instant after which a tripped breaker lets the next call through.
    ///
    /// `None` while below the threshold, or when the backoff has grown past
    /// what an `Instant` can hold.
    pub fn retry_at(&self) -> Option<Instant> {
        let counters = self.read();
        let overshoot = counters
            .consecutive_failures
            .checked_sub(self.failure_threshold)?;
        backoff::retry_at(counters.last_attempt, overshoot)
    }

    /// Current state.
    pub fn state(&self) -> BreakerState {
        self.state_at(Instant::now())
    }

    /// The wrapped circuit.
    pub fn get_ref(&self) -> &C {
        &self.inner
    }

    fn state_at(&self, now: Instant) -> BreakerState {
        let counters = self.read();
        let Some(overshoot) = counters
            .consecutive_failures
            .checked_sub(self.failure_threshold)
        else {
            return BreakerState::Closed;
        };

        match backoff::retry_at(counters.last_attempt, overshoot) {
            Some(retry_at) if now > retry_at => BreakerState::HalfOpen,
            _ => BreakerState::Open,
        }
    }

    fn record(&self, outcome: &CircuitResult) {
        let mut counters = self.write();
        counters.last_attempt = Instant::now();

        match outcome {
            Ok(_) => {
                if counters.consecutive_failures >= self.failure_threshold {
                    tracing::info!(
                        circuit = %self.name,
                        consecutive_failures = counters.consecutive_failures,
                        "Circuit breaker recovered"
                    );
                }
                counters.consecutive_failures = 0;
            }
            Err(_) => {
                counters.consecutive_failures = counters.consecutive_failures.saturating_add(1);
                if counters.consecutive_failures == self.failure_threshold {
                    tracing::warn!(
                        circuit = %self.name,
                        consecutive_failures = counters.consecutive_failures,
                        retry_in_ms = backoff::retry_delay(0).as_millis() as u64,
                        "Circuit breaker tripped"
                    );
                }
            }
        }

        metrics::record_breaker_outcome(&self.name, outcome.is_ok(), counters.consecutive_failures);
    }

    fn read(&self) -> RwLockReadGuard<'_, Counters> {
        self.counters.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Counters> {
        self.counters.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<C: Circuit> Circuit for CircuitBreaker<C> {
    async fn call(&self, ctx: &Context) -> CircuitResult {
        let now = Instant::now();
        if self.state_at(now) == BreakerState::Open {
            tracing::debug!(
                circuit = %self.name,
                request_id = %ctx.request_id(),
                retry_in_ms = ?self
                    .retry_at()
                    .map(|at| at.saturating_duration_since(now).as_millis() as u64),
                "Circuit breaker open, rejecting call"
            );
            metrics::record_breaker_rejected(&self.name);
            return Err(CircuitError::ServiceUnreachable);
        }

        let outcome = self.inner.call(ctx).await;
        self.record(&outcome);
        outcome
    }
}
