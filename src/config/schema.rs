//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section has defaults so a missing or partial file still loads.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the demo binary.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct PatternsConfig {
    /// Circuit breaker settings.
    pub breaker: BreakerConfig,

    /// Debounce settings.
    pub debounce: DebounceConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BreakerConfig {
    /// Consecutive failures before the breaker trips.
    pub failure_threshold: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
        }
    }
}

/// Debounce configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DebounceConfig {
    /// Window in milliseconds during which the cached outcome is served.
    pub threshold_ms: u64,
}

impl DebounceConfig {
    pub fn threshold(&self) -> Duration {
        Duration::from_millis(self.threshold_ms)
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            threshold_ms: 1000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
