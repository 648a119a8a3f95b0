//! The circuit contract shared by every decorator.
//!
//! # Data Flow
//! ```text
//! caller
//!     → outer decorator (gate / cache check)
//!     → inner decorator (optional)
//!     → base circuit (the dependency)
//!     ← outcome flows back, each decorator records its state
//! ```
//!
//! # Design Decisions
//! - A circuit is a trait object with a single async `call`
//! - Decorators are circuits themselves, so they nest freely
//! - The context is forwarded unchanged; decorators never inspect it

pub mod context;
pub mod error;

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::resilience::{CircuitBreaker, DebounceFirst};

pub use context::{CancelHandle, Context};
pub use error::{CircuitError, CircuitResult};

/// An asynchronous unit of work guarded by the resilience decorators.
#[async_trait]
pub trait Circuit: Send + Sync {
    /// Invoke the circuit with the caller's context.
    async fn call(&self, ctx: &Context) -> CircuitResult;
}

#[async_trait]
impl<C: Circuit + ?Sized> Circuit for Arc<C> {
    async fn call(&self, ctx: &Context) -> CircuitResult {
        (**self).call(ctx).await
    }
}

#[async_trait]
impl<C: Circuit + ?Sized> Circuit for Box<C> {
    async fn call(&self, ctx: &Context) -> CircuitResult {
        (**self).call(ctx).await
    }
}

/// A circuit backed by a closure. Built with [`circuit_fn`].
pub struct FnCircuit<F> {
    f: F,
}

/// Turn a closure returning a future into a [`Circuit`].
///
/// The closure receives an owned clone of the caller's context.
pub fn circuit_fn<F, Fut>(f: F) -> FnCircuit<F>
where
    F: Fn(Context) -> Fut + Send + Sync,
    Fut: Future<Output = CircuitResult> + Send + 'static,
{
    FnCircuit { f }
}

#[async_trait]
impl<F, Fut> Circuit for FnCircuit<F>
where
    F: Fn(Context) -> Fut + Send + Sync,
    Fut: Future<Output = CircuitResult> + Send + 'static,
{
    async fn call(&self, ctx: &Context) -> CircuitResult {
        (self.f)(ctx.clone()).await
    }
}

/// Combinators for stacking decorators onto any circuit.
pub trait CircuitExt: Circuit + Sized {
    /// Wrap in a [`CircuitBreaker`] that trips after `failure_threshold`
    /// consecutive failures.
    fn breaker(self, failure_threshold: u32) -> CircuitBreaker<Self> {
        CircuitBreaker::new(self, failure_threshold)
    }

    /// Wrap in a leading-edge [`DebounceFirst`] with the given window.
    fn debounce_first(self, threshold: Duration) -> DebounceFirst<Self> {
        DebounceFirst::new(self, threshold)
    }

    /// Erase the concrete type so differently built circuits can share a slot.
    fn shared(self) -> Arc<dyn Circuit>
    where
        Self: 'static,
    {
        Arc::new(self)
    }
}

impl<C: Circuit> CircuitExt for C {}
