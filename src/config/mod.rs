//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PatternsConfig (validated, immutable)
//!     → thresholds handed to the decorators at construction
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; decorators never see it after construction
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{BreakerConfig, DebounceConfig, ObservabilityConfig, PatternsConfig};
