//! Registrar layer module.
//!
//! A registrar claims a single DevEUI on a remote onboarding service. The
//! pipeline only depends on the [`Registrar`] trait; concrete backends are
//! chosen from configuration.

mod dry_run;
mod lorawan;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{RegistrarConfig, RegistrarKind};
use crate::domain::DevEui;
use crate::error::{AppError, RegistrationError};

pub use dry_run::DryRunRegistrar;
pub use lorawan::LorawanRegistrar;

/// Registration of a single DevEUI.
///
/// Implementations are shared by every processor worker and must be safe to
/// call concurrently.
#[async_trait]
pub trait Registrar: Send + Sync {
    /// Claim `eui` on the remote service.
    ///
    /// Whether an already-registered DevEUI counts as success is decided by
    /// the implementation.
    async fn register(&self, eui: DevEui) -> Result<(), RegistrationError>;

    /// Get the backend name.
    fn backend_name(&self) -> &'static str;
}

/// Create a registrar based on configuration.
///
/// # Errors
///
/// Returns an error if the registrar backend cannot be initialized.
pub fn create_registrar(config: &RegistrarConfig) -> Result<Arc<dyn Registrar>, AppError> {
    match config.kind {
        RegistrarKind::Lorawan => Ok(Arc::new(LorawanRegistrar::new(config)?)),
        RegistrarKind::DryRun => Ok(Arc::new(DryRunRegistrar::new())),
    }
}
