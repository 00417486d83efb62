//! Registrar configuration.

use config::ConfigError;
use serde::Deserialize;

/// Registrar backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrarKind {
    /// HTTP onboarding service.
    #[default]
    Lorawan,
    /// Accept every DevEUI without network I/O.
    DryRun,
}

impl std::fmt::Display for RegistrarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lorawan => write!(f, "lorawan"),
            Self::DryRun => write!(f, "dry_run"),
        }
    }
}

/// Registrar configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrarConfig {
    /// Registrar backend type.
    #[serde(default)]
    pub kind: RegistrarKind,

    /// Onboarding endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Report `422 Unprocessable Entity` as success.
    #[serde(default)]
    pub accept_already_registered: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://europe-west1-machinemax-dev-d524.cloudfunctions.net/sensor-onboarding-sample"
        .to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl RegistrarConfig {
    /// Validate the registrar configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute URL for the HTTP
    /// backend, or the timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "registrar.timeout_secs cannot be 0".to_string(),
            ));
        }

        match self.kind {
            RegistrarKind::Lorawan => {
                url::Url::parse(&self.endpoint).map_err(|e| {
                    ConfigError::Message(format!("registrar.endpoint is not a valid URL: {e}"))
                })?;
                Ok(())
            }
            RegistrarKind::DryRun => Ok(()),
        }
    }

    /// Copy of this configuration with already-registered DevEUIs accepted.
    #[must_use]
    pub fn accepting_already_registered(&self) -> Self {
        Self {
            accept_already_registered: true,
            ..self.clone()
        }
    }
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            kind: RegistrarKind::default(),
            endpoint: default_endpoint(),
            accept_already_registered: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}
