//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `KANTIFY` prefix and nested values use double underscores as separators.
//!
//! Every section has defaults, so an empty environment yields a working
//! offline configuration (in-memory storage, built-in corpus, no AI).
//!
//! # Example
//!
//! ```no_run
//! use kantify::config::{init_tracing, AppConfig};
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! init_tracing(&config.telemetry).expect("Failed to initialise tracing");
//! ```

mod ai;
mod error;
mod session;
mod storage;
mod telemetry;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use session::SessionConfig;
pub use storage::{StorageBackend, StorageConfig};
pub use telemetry::{init_tracing, TelemetryConfig};

use serde::Deserialize;

/// Environment variable prefix, e.g. `KANTIFY__AI__API_KEY`
pub const ENV_PREFIX: &str = "KANTIFY";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.storage.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}
