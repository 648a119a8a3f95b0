//! Error types surfaced through the circuit contract.

use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Errors a circuit call can return.
///
/// `Clone` so a debounced outcome can be replayed to every caller in the
/// window. Dependency errors are shared behind an `Arc` for the same reason.
#[derive(Debug, Clone, Error)]
pub enum CircuitError {
    /// The breaker rejected the call before it reached the dependency.
    #[error("service unreachable")]
    ServiceUnreachable,

    /// The caller's context was cancelled while the dependency was working.
    #[error("context canceled")]
    Cancelled,

    /// Error produced by the wrapped dependency, passed through verbatim.
    #[error(transparent)]
    Dependency(Arc<dyn StdError + Send + Sync>),
}

impl CircuitError {
    /// Wrap a dependency error or message.
    pub fn dependency<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::Dependency(Arc::from(err.into()))
    }

    /// True if the breaker rejected the call.
    pub fn is_service_unreachable(&self) -> bool {
        matches!(self, Self::ServiceUnreachable)
    }
}

/// Result type of a single circuit call.
pub type CircuitResult = Result<String, CircuitError>;
