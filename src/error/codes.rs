//! Error code constants.
//!
//! Error codes are organized by category:
//! - 1xxx: Configuration errors
//! - 3xxx: Validation errors
//! - 4xxx: Registration errors
//! - 5xxx: Internal/System errors

/// Error code type with semantic categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(i32);

impl ErrorCode {
    // ===== Configuration Errors (1xxx) =====

    /// Invalid configuration parameters.
    pub const INVALID_CONFIG: Self = Self(1003);

    // ===== Validation Errors (3xxx) =====

    /// Malformed idempotency key.
    pub const INVALID_KEY: Self = Self(3001);

    // ===== Registration Errors (4xxx) =====

    /// DevEUI already claimed on the onboarding service.
    pub const ALREADY_REGISTERED: Self = Self(4001);

    /// Registration failed for any other reason.
    pub const REGISTRATION_FAILED: Self = Self(4002);

    // ===== Internal/System Errors (5xxx) =====

    /// Random source failure.
    pub const RANDOM_SOURCE: Self = Self(5001);

    /// Registrar backend unavailable.
    pub const REGISTRAR_UNAVAILABLE: Self = Self(5003);

    /// Get the error code as an i32.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Get the category of this error code.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self.0 {
            1000..=1999 => ErrorCategory::Configuration,
            3000..=3999 => ErrorCategory::Validation,
            4000..=4999 => ErrorCategory::Registration,
            5000..=5999 => ErrorCategory::Internal,
            _ => ErrorCategory::Unknown,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.0
    }
}

impl From<&crate::error::RegistrationError> for ErrorCode {
    fn from(err: &crate::error::RegistrationError) -> Self {
        if err.is_already_registered() {
            Self::ALREADY_REGISTERED
        } else {
            Self::REGISTRATION_FAILED
        }
    }
}

/// Error category based on error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Configuration-related errors (1xxx).
    Configuration,
    /// Validation errors (3xxx).
    Validation,
    /// Registration errors (4xxx).
    Registration,
    /// Internal/system errors (5xxx).
    Internal,
    /// Unknown category.
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Validation => write!(f, "validation"),
            Self::Registration => write!(f, "registration"),
            Self::Internal => write!(f, "internal"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistrationError;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::INVALID_CONFIG.as_i32(), 1003);
        assert_eq!(ErrorCode::INVALID_KEY.as_i32(), 3001);
        assert_eq!(ErrorCode::ALREADY_REGISTERED.as_i32(), 4001);
        assert_eq!(ErrorCode::REGISTRAR_UNAVAILABLE.as_i32(), 5003);
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ErrorCode::INVALID_CONFIG.category(),
            ErrorCategory::Configuration
        );
        assert_eq!(ErrorCode::INVALID_KEY.category(), ErrorCategory::Validation);
        assert_eq!(
            ErrorCode::REGISTRATION_FAILED.category(),
            ErrorCategory::Registration
        );
        assert_eq!(ErrorCode::RANDOM_SOURCE.category(), ErrorCategory::Internal);
        assert_eq!(ErrorCode(42).category(), ErrorCategory::Unknown);
    }

    #[test]
    fn test_registration_error_codes() {
        let eui = "0000000000000001".parse().unwrap();
        assert_eq!(
            ErrorCode::from(&RegistrationError::AlreadyRegistered(eui)),
            ErrorCode::ALREADY_REGISTERED
        );
        assert_eq!(
            ErrorCode::from(&RegistrationError::failed(eui, "timeout")),
            ErrorCode::REGISTRATION_FAILED
        );
    }
}
