//! HTTP registrar for the LoRaWAN sensor onboarding service.
//!
//! Wire contract: `POST {"deveui": "<16 hex>"}` to the configured endpoint.
//! `200` means registered, `422` means the DevEUI is already in use, anything
//! else is a failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::config::RegistrarConfig;
use crate::domain::{DevEui, OnboardingRequest};
use crate::error::{AppError, RegistrationError};
use crate::registrar::Registrar;

/// Registrar backed by the onboarding HTTP endpoint.
#[derive(Debug, Clone)]
pub struct LorawanRegistrar {
    /// HTTP client (connection pool shared across workers).
    client: Client,
    /// Onboarding endpoint.
    endpoint: Url,
    /// Treat `422 Unprocessable Entity` as success.
    accept_already_registered: bool,
}

impl LorawanRegistrar {
    /// Create a registrar from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn new(config: &RegistrarConfig) -> Result<Self, AppError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            AppError::InvalidConfig(format!(
                "registrar.endpoint '{}' is not a valid URL: {e}",
                config.endpoint
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Registrar(e.to_string()))?;

        Ok(Self::with_client(
            client,
            endpoint,
            config.accept_already_registered,
        ))
    }

    /// Create a registrar around an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Client, endpoint: Url, accept_already_registered: bool) -> Self {
        Self {
            client,
            endpoint,
            accept_already_registered,
        }
    }

    /// Whether already-registered DevEUIs are reported as success.
    #[must_use]
    pub const fn accepts_already_registered(&self) -> bool {
        self.accept_already_registered
    }
}

#[async_trait]
impl Registrar for LorawanRegistrar {
    async fn register(&self, eui: DevEui) -> Result<(), RegistrationError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&OnboardingRequest { deveui: eui })
            .send()
            .await
            .map_err(|e| RegistrationError::failed(eui, e.to_string()))?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::UNPROCESSABLE_ENTITY if self.accept_already_registered => {
                tracing::debug!(%eui, "DevEUI already registered, accepting");
                Ok(())
            }
            StatusCode::UNPROCESSABLE_ENTITY => Err(RegistrationError::AlreadyRegistered(eui)),
            status => Err(RegistrationError::failed(
                eui,
                format!("unexpected response status {status}"),
            )),
        }
    }

    fn backend_name(&self) -> &'static str {
        "lorawan"
    }
}
