//! Leading-edge debounce.
//!
//! # Responsibilities
//! - Run the first call of a burst against the wrapped circuit
//! - Answer every call inside the window from the cached outcome
//! - Refresh the cache once the window has passed
//!
//! # Design Decisions
//! - Errors are cached and replayed exactly like successes
//! - Cache hits do not extend the window
//! - Exactly one cached outcome per instance, no keys

use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tokio::time::Instant;

use crate::circuit::{Circuit, CircuitResult, Context};
use crate::observability::metrics;

#[derive(Debug, Clone)]
struct CachedOutcome {
    outcome: CircuitResult,
    recorded_at: Instant,
}

/// Wraps a circuit and suppresses repeat calls within `threshold`.
pub struct DebounceFirst<C> {
    inner: C,
    name: String,
    threshold: Duration,
    cache: RwLock<Option<CachedOutcome>>,
}

impl<C: Circuit> DebounceFirst<C> {
    pub fn new(inner: C, threshold: Duration) -> Self {
        Self {
            inner,
            name: "circuit".to_string(),
            threshold,
            cache: RwLock::new(None),
        }
    }

    /// Label used in logs and metrics.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// When the cached outcome was produced, if any call has completed yet.
    pub fn last_call_time(&self) -> Option<Instant> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|entry| entry.recorded_at)
    }

    pub fn get_ref(&self) -> &C {
        &self.inner
    }

    fn cached_at(&self, now: Instant) -> Option<CircuitResult> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        let entry = cache.as_ref()?;
        (now.saturating_duration_since(entry.recorded_at) < self.threshold)
            .then(|| entry.outcome.clone())
    }

    fn store(&self, outcome: CircuitResult) {
        let entry = CachedOutcome {
            outcome,
            recorded_at: Instant::now(),
        };
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = Some(entry);
    }
}

#[async_trait]
impl<C: Circuit> Circuit for DebounceFirst<C> {
    async fn call(&self, ctx: &Context) -> CircuitResult {
        if let Some(outcome) = self.cached_at(Instant::now()) {
            tracing::debug!(
                circuit = %self.name,
                request_id = %ctx.request_id(),
                "Serving debounced outcome"
            );
            metrics::record_debounce(&self.name, true);
            return outcome;
        }

        metrics::record_debounce(&self.name, false);
        let outcome = self.inner.call(ctx).await;
        self.store(outcome.clone());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{circuit_fn, CircuitError};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counting_circuit(calls: Arc<AtomicU32>) -> impl Circuit {
        circuit_fn(move |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok(format!("ok:{n}")) }
        })
    }

    #[tokio::test]
    async fn test_initial_call_is_forwarded() {
        let calls = Arc::new(AtomicU32::new(0));
        let circuit = DebounceFirst::new(counting_circuit(calls.clone()), Duration::from_secs(1));
        assert!(circuit.last_call_time().is_none());

        let res = circuit.call(&Context::background()).await;
        assert_eq!(res.unwrap(), "ok:1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(circuit.last_call_time().is_some());
    }

    #[tokio::test]
    async fn test_calls_within_threshold_hit_cache() {
        let calls = Arc::new(AtomicU32::new(0));
        let circuit = DebounceFirst::new(counting_circuit(calls.clone()), Duration::from_secs(100));
        let ctx = Context::background();
        let _ = circuit.call(&ctx).await;

        for _ in 0..5 {
            assert_eq!(circuit.call(&ctx).await.unwrap(), "ok:1");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_call_after_threshold_refreshes() {
        let calls = Arc::new(AtomicU32::new(0));
        let circuit = DebounceFirst::new(counting_circuit(calls.clone()), Duration::from_millis(10));
        let ctx = Context::background();
        let _ = circuit.call(&ctx).await;

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(circuit.call(&ctx).await.unwrap(), "ok:2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_are_replayed_from_cache() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let circuit = DebounceFirst::new(
            circuit_fn(move |_| {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Err(CircuitError::dependency(format!("fail:{n}"))) }
            }),
            Duration::from_secs(1),
        );
        let ctx = Context::background();

        for _ in 0..3 {
            assert_eq!(circuit.call(&ctx).await.unwrap_err().to_string(), "fail:1");
        }
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(circuit.call(&ctx).await.unwrap_err().to_string(), "fail:2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_hits_do_not_extend_window() {
        let calls = Arc::new(AtomicU32::new(0));
        let circuit = DebounceFirst::new(counting_circuit(calls.clone()), Duration::from_secs(1));
        let ctx = Context::background();
        let _ = circuit.call(&ctx).await;
        let first = circuit.last_call_time();

        tokio::time::advance(Duration::from_millis(600)).await;
        assert_eq!(circuit.call(&ctx).await.unwrap(), "ok:1");
        assert_eq!(circuit.last_call_time(), first);

        tokio::time::advance(Duration::from_millis(600)).await;
        assert_eq!(circuit.call(&ctx).await.unwrap(), "ok:2");
    }
}
