//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind host: {0}")]
    InvalidHost(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Interval '{0}' must be greater than zero")]
    ZeroInterval(&'static str),

    #[error("Progress step must be between 1 and 100, got {0}")]
    InvalidProgressStep(u8),

    #[error("Reply latency of {latency_ms}ms does not fit in the {timeout_secs}s request timeout")]
    ReplyLatencyExceedsTimeout { latency_ms: u64, timeout_secs: u64 },
}
