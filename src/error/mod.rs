//! Error handling module.
//!
//! This module provides unified error handling with proper HTTP status code mapping
//! and standardized API error responses, plus the per-concern errors raised by
//! the generation and registration pipeline.

pub mod codes;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::{ApiResponse, DevEui, MAX_BATCH};

pub use codes::ErrorCode;

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed idempotency key.
    #[error("Invalid idempotency key: {0}")]
    InvalidKey(#[from] KeyParseError),

    /// A batch could not be generated.
    #[error("Could not generate DevEUI batch: {0}")]
    Generation(#[from] GenerateError),

    /// Registrar backend could not be built.
    #[error("Registrar error: {0}")]
    Registrar(String),
}

impl AppError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidConfig(_) => ErrorCode::INVALID_CONFIG,
            Self::InvalidKey(_) => ErrorCode::INVALID_KEY,
            Self::Generation(_) => ErrorCode::RANDOM_SOURCE,
            Self::Registrar(_) => ErrorCode::REGISTRAR_UNAVAILABLE,
        }
    }

    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidKey(_) => StatusCode::BAD_REQUEST,
            Self::Registrar(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidConfig(_) | Self::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();

        tracing::error!(
            error_code = code.as_i32(),
            category = %code.category(),
            status = %status,
            message = %message,
            "Request failed"
        );

        let body = Json(ApiResponse::<()>::error(code.as_i32(), message));

        (status, body).into_response()
    }
}

/// DevEUI parse failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    /// Input is not exactly 16 characters.
    #[error("expected 16 hex characters, got {0}")]
    InvalidLength(usize),

    /// Input contains non-hex characters.
    #[error("not a hex string: {0}")]
    InvalidHex(String),
}

/// Idempotency key parse failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyParseError {
    /// Key is shorter than 8 or longer than 16 characters.
    #[error("expected 8 to 16 hex characters, got {0}")]
    InvalidLength(usize),

    /// Key contains non-hex characters.
    #[error("not a hex string: {0}")]
    InvalidHex(String),
}

/// Failure reading from a random source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("random source failure: {0}")]
pub struct RandomError(String);

impl RandomError {
    /// Create a new random source error.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Batch generation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// The random source failed; no partial batch is kept.
    #[error(transparent)]
    Source(#[from] RandomError),

    /// More DevEUIs requested than there are distinct short forms.
    #[error("batch of {0} exceeds the {max} distinct short forms", max = MAX_BATCH)]
    BatchTooLarge(usize),
}

/// Classified failure to register a single DevEUI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// The onboarding service already holds this DevEUI.
    #[error("DevEUI {0} has already been used")]
    AlreadyRegistered(DevEui),

    /// Any other remote or transport failure.
    #[error("failed to register DevEUI {eui}: {reason}")]
    Failed {
        /// DevEUI that could not be registered.
        eui: DevEui,
        /// Human-readable failure detail.
        reason: String,
    },
}

impl RegistrationError {
    /// Create a generic failure for a DevEUI.
    pub fn failed(eui: DevEui, reason: impl Into<String>) -> Self {
        Self::Failed {
            eui,
            reason: reason.into(),
        }
    }

    /// DevEUI this failure refers to.
    #[must_use]
    pub const fn eui(&self) -> DevEui {
        match self {
            Self::AlreadyRegistered(eui) | Self::Failed { eui, .. } => *eui,
        }
    }

    /// Whether the service reported the DevEUI as already in use.
    #[must_use]
    pub const fn is_already_registered(&self) -> bool {
        matches!(self, Self::AlreadyRegistered(_))
    }

    /// Metric label for this failure kind.
    #[must_use]
    pub const fn reason_label(&self) -> &'static str {
        match self {
            Self::AlreadyRegistered(_) => "already_registered",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
