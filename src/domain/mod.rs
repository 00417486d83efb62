//! Domain models for the DevEUI worker.
//!
//! This module contains the identifier value types and API contracts.

pub mod dev_eui;
pub mod dto;
pub mod idempotency;

pub use dev_eui::{Batch, DEV_EUI_LEN, DevEui, FULL_FORM_LEN, MAX_BATCH, ShortForm};
pub use dto::{ApiResponse, HealthResponse, OnboardingRequest};
pub use idempotency::IdempotencyKey;
