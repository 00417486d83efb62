//! Configuration management module.
//!
//! Supports loading configuration from:
//! - TOML files (config/default.toml, config/{profile}.toml)
//! - Environment variables with `DEVEUI_WORKER__<SECTION>__<KEY>` pattern

mod registrar;
mod server;

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::MAX_BATCH;

pub use registrar::{RegistrarConfig, RegistrarKind};
pub use server::ServerConfig;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Registrar backend configuration.
    #[serde(default)]
    pub registrar: RegistrarConfig,

    /// Batch issuance configuration.
    #[serde(default)]
    pub issuance: IssuanceConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. `config/default.toml`
    /// 2. `config/{DEVEUI_PROFILE}.toml` (if `DEVEUI_PROFILE` is set)
    /// 3. Environment variables with `DEVEUI_WORKER__` prefix
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded. The result is not
    /// validated, so callers can apply overrides before calling
    /// [`AppConfig::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        let profile =
            std::env::var("DEVEUI_PROFILE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{profile}")).required(false))
            // DEVEUI_WORKER__ISSUANCE__WORKERS=20 -> issuance.workers = 20
            .add_source(
                Environment::with_prefix("DEVEUI_WORKER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(config)
    }

    /// Deserialize an already-built source stack without validating it.
    fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.try_deserialize()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("server.port cannot be 0".to_string()));
        }

        self.registrar.validate()?;
        self.issuance.validate()?;

        Ok(())
    }
}

/// Batch issuance configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuanceConfig {
    /// Number of DevEUIs the CLI registers before exiting.
    #[serde(default = "default_target")]
    pub target: usize,

    /// Number of DevEUIs generated per server request.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Concurrent registration workers.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Pause after a round that registered nothing, in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

const fn default_target() -> usize {
    100
}

const fn default_batch_size() -> usize {
    100
}

const fn default_workers() -> usize {
    10
}

const fn default_retry_backoff_ms() -> u64 {
    500
}

impl IssuanceConfig {
    /// Validate the issuance configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker count or batch size is zero, or if the
    /// batch size exceeds [`MAX_BATCH`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Message(
                "issuance.workers cannot be 0".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Message(
                "issuance.batch_size cannot be 0".to_string(),
            ));
        }
        if self.batch_size > MAX_BATCH {
            return Err(ConfigError::Message(format!(
                "issuance.batch_size cannot exceed {MAX_BATCH}"
            )));
        }
        Ok(())
    }

    /// Backoff as a [`Duration`].
    #[must_use]
    pub const fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            batch_size: default_batch_size(),
            workers: default_workers(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "text" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Enable Prometheus metrics endpoint.
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

const fn default_metrics_enabled() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.registrar.kind, RegistrarKind::Lorawan);
        assert_eq!(config.issuance.target, 100);
        assert_eq!(config.issuance.batch_size, 100);
        assert_eq!(config.issuance.workers, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = AppConfig::default();
        config.issuance.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_batch_size_bounded_by_short_forms() {
        let mut config = AppConfig::default();
        config.issuance.batch_size = MAX_BATCH;
        assert!(config.validate().is_ok());

        config.issuance.batch_size = MAX_BATCH + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_large_target_accepted() {
        let mut config = AppConfig::default();
        config.issuance.target = MAX_BATCH * 4;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_applied_before_validation() {
        let sources = Config::builder()
            .add_source(config::File::from_str(
                "[issuance]\nworkers = 0\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let mut config = AppConfig::from_config(sources).unwrap();
        assert!(config.validate().is_err());

        config.issuance.workers = 4;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let config: AppConfig = Config::builder()
            .add_source(config::File::from_str(
                r#"
                [registrar]
                kind = "dry_run"

                [issuance]
                workers = 4
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.registrar.kind, RegistrarKind::DryRun);
        assert_eq!(config.issuance.workers, 4);
        assert_eq!(config.issuance.batch_size, 100);
        assert_eq!(config.server.port, 8080);
    }
}
