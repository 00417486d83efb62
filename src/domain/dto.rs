//! Data Transfer Objects for API responses.

use serde::{Deserialize, Serialize};

use crate::domain::DevEui;

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response code (0 = success, non-zero = error).
    pub code: i32,

    /// Human-readable message.
    pub message: String,

    /// Response data (null on error).
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a success response.
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    /// Create an error response.
    pub fn error(code: i32, message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,

    /// Service version.
    pub version: String,

    /// Registrar backend in use.
    pub registrar: String,
}

/// JSON body posted to the onboarding service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OnboardingRequest {
    /// DevEUI being claimed.
    pub deveui: DevEui,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success(vec![1, 2, 3]);
        assert_eq!(response.code, 0);
        assert_eq!(response.message, "success");
        assert_eq!(response.data, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_api_response_error_serializes_null_data() {
        let response = ApiResponse::<()>::error(3001, "bad key");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], 3001);
        assert_eq!(json["message"], "bad key");
        assert!(json["data"].is_null());
    }

    #[test]
    fn test_onboarding_request_wire_format() {
        let request = OnboardingRequest {
            deveui: "DEADBEEFDEADBEEF".parse().unwrap(),
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"deveui":"DEADBEEFDEADBEEF"}"#
        );
    }
}
