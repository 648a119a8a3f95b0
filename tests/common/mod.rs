//! Shared mock circuits for integration tests.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use circuit_patterns::{circuit_fn, Circuit, CircuitError};

/// A circuit that fails every call with `message`, counting invocations.
pub fn failing_circuit(message: &'static str, calls: Arc<AtomicU32>) -> impl Circuit {
    circuit_fn(move |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move { Err(CircuitError::dependency(message)) }
    })
}

/// A circuit that answers `ok:<n>` where `n` is its invocation count.
pub fn counting_circuit(calls: Arc<AtomicU32>) -> impl Circuit {
    circuit_fn(move |_| {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move { Ok(format!("ok:{n}")) }
    })
}

/// A counting circuit that fails while `down` is set.
#[allow(dead_code)]
pub fn switchable_circuit(down: Arc<AtomicBool>, calls: Arc<AtomicU32>) -> impl Circuit {
    circuit_fn(move |_| {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        let down = down.load(Ordering::SeqCst);
        async move {
            if down {
                Err(CircuitError::dependency("service error"))
            } else {
                Ok(format!("ok:{n}"))
            }
        }
    })
}

/// A counting circuit that takes `latency` to answer.
#[allow(dead_code)]
pub fn slow_circuit(latency: Duration, calls: Arc<AtomicU32>) -> impl Circuit {
    circuit_fn(move |_| {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            tokio::time::sleep(latency).await;
            Ok(format!("ok:{n}"))
        }
    })
}
