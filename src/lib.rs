//! Composable resilience decorators for asynchronous circuits.
//!
//! A [`Circuit`] is any async unit of work taking a [`Context`]. The
//! decorators here take a circuit and return a circuit, so they stack:
//!
//! ```no_run
//! use std::time::Duration;
//! use circuit_patterns::{circuit_fn, Circuit, CircuitExt, Context};
//!
//! # async fn demo() {
//! let dependency = circuit_fn(|_ctx| async { Ok("pong".to_string()) });
//! let guarded = dependency.breaker(3).debounce_first(Duration::from_secs(1));
//! let reply = guarded.call(&Context::background()).await;
//! # }
//! ```

pub mod circuit;
pub mod config;
pub mod observability;
pub mod resilience;

pub use circuit::{circuit_fn, CancelHandle, Circuit, CircuitError, CircuitExt, CircuitResult, Context};
pub use config::PatternsConfig;
pub use resilience::{BreakerState, CircuitBreaker, DebounceFirst};
