//! Registrar that accepts everything without network I/O.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::domain::DevEui;
use crate::error::RegistrationError;
use crate::registrar::Registrar;

/// Accepts every DevEUI. Useful for local runs and tests.
#[derive(Debug, Default)]
pub struct DryRunRegistrar {
    calls: AtomicU64,
}

impl DryRunRegistrar {
    /// Create a new dry-run registrar.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
        }
    }

    /// Number of registrations accepted so far.
    #[must_use]
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Registrar for DryRunRegistrar {
    async fn register(&self, eui: DevEui) -> Result<(), RegistrationError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(%eui, "Dry-run registration accepted");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "dry_run"
    }
}
