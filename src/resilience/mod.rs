//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call into a decorated circuit:
//!     → debounce.rs (serve cached outcome inside the window)
//!     → circuit_breaker.rs (reject while tripped, else forward)
//!     → backoff.rs (how long a tripped breaker stays shut)
//!     → wrapped circuit
//! ```
//!
//! # Design Decisions
//! - Decorators are circuits, so any stacking order composes
//! - Locks are never held across the wrapped call
//! - Gate and cache checks race with outcome recording; two callers may
//!   both get through a borderline gate or both miss an expired cache
//! - No timers or background tasks; all gating is timestamp arithmetic

pub mod backoff;
pub mod circuit_breaker;
pub mod debounce;

pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use debounce::DebounceFirst;
