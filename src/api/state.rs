//! Application state for Axum handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::registrar::{Registrar, create_registrar};
use crate::service::Processor;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Registrar used for request batches. Always accepts already-registered
    /// DevEUIs so that repeated requests converge on the same set.
    pub registrar: Arc<dyn Registrar>,
    /// Prometheus handle, when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create application state, building the registrar from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the registrar cannot be initialized.
    pub fn new(config: Arc<AppConfig>, metrics: Option<PrometheusHandle>) -> Result<Self, AppError> {
        let registrar = create_registrar(&config.registrar.accepting_already_registered())?;
        Ok(Self::with_registrar(config, registrar, metrics))
    }

    /// Create application state around an existing registrar.
    pub fn with_registrar(
        config: Arc<AppConfig>,
        registrar: Arc<dyn Registrar>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            config,
            registrar,
            metrics,
        }
    }

    /// Build a processor for one request.
    pub fn processor(&self) -> Processor {
        Processor::new(Arc::clone(&self.registrar), self.config.issuance.workers)
    }
}
