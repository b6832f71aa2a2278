//! Application configuration module
//!
//! Configuration is read from environment variables (and an optional `.env`
//! file) using the `config` and `dotenvy` crates. Variables carry the
//! `CREANVA` prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use creanva::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod features;
mod server;
mod simulation;

pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use server::{Environment, ServerConfig};
pub use simulation::SimulationConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// development setup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP listener (host, port, environment, CORS)
    #[serde(default)]
    pub server: ServerConfig,

    /// Timer settings for the simulated flows
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `CREANVA__SERVER__PORT=3000` -> `server.port = 3000`
    /// - `CREANVA__SIMULATION__TICK_INTERVAL_MS=50` -> `simulation.tick_interval_ms = 50`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed into its expected type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CREANVA")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.simulation.validate()?;

        // A chat send answers only after the reply latency
        let timeout_ms = self.server.request_timeout_secs.saturating_mul(1000);
        if self.simulation.reply_latency_ms >= timeout_ms {
            return Err(ValidationError::ReplyLatencyExceedsTimeout {
                latency_ms: self.simulation.reply_latency_ms,
                timeout_secs: self.server.request_timeout_secs,
            });
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const KEYS: [&str; 4] = [
        "CREANVA__SERVER__PORT",
        "CREANVA__SERVER__ENVIRONMENT",
        "CREANVA__SIMULATION__PROGRESS_STEP",
        "CREANVA__FEATURES__JSON_LOGS",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_with_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.simulation, SimulationConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CREANVA__SERVER__PORT", "3000");
        env::set_var("CREANVA__SIMULATION__PROGRESS_STEP", "25");
        env::set_var("CREANVA__FEATURES__JSON_LOGS", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.simulation.progress_step, 25);
        assert!(config.features.json_logs);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CREANVA__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn test_validate_rejects_bad_simulation() {
        let config = AppConfig {
            simulation: SimulationConfig {
                progress_step: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidProgressStep(0))
        );
    }

    #[test]
    fn test_validate_rejects_latency_beyond_request_timeout() {
        let mut config = AppConfig::default();
        config.server.request_timeout_secs = 5;
        config.simulation.reply_latency_ms = 5_000;
        assert_eq!(
            config.validate(),
            Err(ValidationError::ReplyLatencyExceedsTimeout {
                latency_ms: 5_000,
                timeout_secs: 5,
            })
        );

        config.simulation.reply_latency_ms = 4_999;
        assert!(config.validate().is_ok());
    }
}
