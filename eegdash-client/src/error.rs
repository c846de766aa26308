//! Error types for eegdash-client
//!
//! Every failure a caller can see is one [`ApiError`]. Its `Display` output is
//! the human-readable message shown to the user; no variant is retried
//! automatically.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failed before a response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered 401. Credential state has already been cleared and
    /// the login view requested; callers must not retry.
    #[error("Unauthorized")]
    Unauthorized,

    /// Rejected input (400/409/422), shown inline next to the offending field
    #[error("{message}")]
    Validation { status: u16, message: String },

    /// Any other non-2xx reply. `message` is the server's `error` field or
    /// `HTTP <status>` when the body carried none.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A 2xx body that is not the expected JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Identifier refused before dispatch
    #[error("{0}")]
    InvalidIdentifier(String),

    /// Caller input refused before dispatch
    #[error("{0}")]
    InvalidInput(String),

    /// Local storage, configuration or I/O failure
    #[error(transparent)]
    Common(#[from] eegdash_common::Error),
}

impl ApiError {
    /// Build the error for a non-2xx, non-401 reply
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let message = extract_error_message(body)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        match status.as_u16() {
            // Bad request, conflict, unprocessable entity
            400 | 409 | 422 => ApiError::Validation {
                status: status.as_u16(),
                message,
            },
            code => ApiError::Server {
                status: code,
                message,
            },
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Validation { status, .. } | ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 401; the session is gone and the user must log in again
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Common(eegdash_common::Error::Io(err))
    }
}

/// Pull a human-readable message out of an error body
///
/// Accepts `{"error": "msg"}` and `{"error": {"message": "msg"}}`.
fn extract_error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let error = value.get("error")?;

    let message = match error {
        Value::String(s) => s.clone(),
        Value::Object(obj) => obj.get("message")?.as_str()?.to_string(),
        _ => return None,
    };

    if message.trim().is_empty() {
        None
    } else {
        Some(message)
    }
}

/// Result type for client operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_is_used() {
        let err = ApiError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"error": "Failed to create analysis job"}"#,
        );
        assert_eq!(err.to_string(), "Failed to create analysis job");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_malformed_body_falls_back_to_status() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, b"<html>oops</html>");
        assert_eq!(err.to_string(), "HTTP 502");
    }

    #[test]
    fn test_body_without_error_field_falls_back() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, br#"{"detail": "missing"}"#);
        assert_eq!(err.to_string(), "HTTP 404");
        assert!(matches!(err, ApiError::Server { status: 404, .. }));
    }

    #[test]
    fn test_nested_error_message() {
        let err = ApiError::from_status(
            StatusCode::SERVICE_UNAVAILABLE,
            br#"{"error": {"code": "DOWN", "message": "Maintenance"}}"#,
        );
        assert_eq!(err.to_string(), "Maintenance");
    }

    #[test]
    fn test_conflict_is_validation() {
        let err = ApiError::from_status(
            StatusCode::CONFLICT,
            br#"{"error": "Patient ID 'PT-1' already exists.", "existing_job_id": 7}"#,
        );
        assert!(matches!(err, ApiError::Validation { status: 409, .. }));
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_unauthorized_message() {
        assert_eq!(ApiError::Unauthorized.to_string(), "Unauthorized");
        assert!(ApiError::Unauthorized.is_unauthorized());
    }
}
