use std::collections::HashMap;
use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error payload the backend puts in non-2xx bodies, either at the top
/// level or nested under a `detail` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "error")]
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Vec<String>>>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Stand-in payload for error responses that carry no usable JSON body.
    pub fn unknown(status: StatusCode) -> Self {
        Self::new(
            "unknown_error",
            format!("Request failed with status {}", status.as_u16()),
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

#[derive(Debug, Error)]
pub enum ApiClientError {
    /// The backend answered, but with a non-success status.
    #[error("api error {status}: {error}")]
    Status { status: StatusCode, error: ApiError },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered 2xx but the body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiClientError {
    /// Machine-readable code for the failure. Transport failures and decode
    /// failures get fixed codes so callers can branch without matching on
    /// the enum.
    pub fn code(&self) -> &str {
        match self {
            ApiClientError::Status { error, .. } => &error.code,
            ApiClientError::Network(_) => "NETWORK_ERROR",
            ApiClientError::Decode(_) => "decode_error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiClientError::Status { error, .. } => error.message.clone(),
            ApiClientError::Network(e) => e.to_string(),
            ApiClientError::Decode(e) => e.to_string(),
        }
    }

    /// HTTP status, when the failure came from an actual response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 401 responses, the backend's signal that the stored
    /// credential is missing, expired, or revoked.
    pub fn is_auth_expired(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_error_carries_status_code() {
        let error = ApiError::unknown(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.code, "unknown_error");
        assert_eq!(error.message, "Request failed with status 500");
    }

    #[test]
    fn test_detail_payload_deserializes() {
        let body = r#"{"error":"validation_error","message":"Invalid task","details":{"title":["Title is required"]}}"#;
        let error: ApiError = serde_json::from_str(body).expect("Failed to parse error body");
        assert_eq!(error.code, "validation_error");
        let details = error.details.expect("details missing");
        assert_eq!(details["title"], vec!["Title is required".to_string()]);
    }

    #[test]
    fn test_auth_expiry_is_status_401() {
        let err = ApiClientError::Status {
            status: StatusCode::UNAUTHORIZED,
            error: ApiError::new("invalid_token", "Token has expired"),
        };
        assert!(err.is_auth_expired());
        assert_eq!(err.code(), "invalid_token");
    }
}
