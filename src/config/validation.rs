//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (thresholds > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PatternsConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::PatternsConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("breaker.failure_threshold must be at least 1")]
    ZeroFailureThreshold,

    #[error("debounce.threshold_ms must be greater than 0")]
    ZeroDebounceThreshold,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),

    #[error("observability.metrics_address '{0}' is not a valid socket address")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &PatternsConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.breaker.failure_threshold == 0 {
        errors.push(ValidationError::ZeroFailureThreshold);
    }

    if config.debounce.threshold_ms == 0 {
        errors.push(ValidationError::ZeroDebounceThreshold);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
