//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Failed to initialise tracing: {0}")]
    Telemetry(String),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid AI base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid AI request timeout")]
    InvalidTimeout,

    #[error("AI temperature must be within [0, 2], got {0}")]
    InvalidTemperature(f32),

    #[error("AI max_tokens must be greater than zero")]
    InvalidMaxTokens,

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
