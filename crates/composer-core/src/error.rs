//! Error Types
//!
//! Failures surfaced by the API seam and by template persistence.

use serde_json::Value;
use thiserror::Error;

pub type ComposeResult<T> = Result<T, ComposeError>;

/// Which template input rejected a save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFieldError {
    Id,
    Label,
}

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("invalid template {field:?}: {reason}")]
    InvalidTemplate {
        field: TemplateFieldError,
        reason: String,
    },

    #[error("storage write failed for {key}: {reason}")]
    Storage { key: String, reason: String },

    #[error("template not found: {0}")]
    TemplateNotFound(String),
}

/// Errors from the HTTP bindings
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response; `payload` is the parsed body (Null when unparseable)
    #[error("http {status}: {}", error_message(.payload).unwrap_or("request failed"))]
    Status { status: u16, payload: Value },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("request superseded")]
    Aborted,
}

impl ApiError {
    /// Server-provided `detail` or `message`, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Status { payload, .. } => error_message(payload),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiError::Status { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

fn error_message(payload: &Value) -> Option<&str> {
    payload
        .get("detail")
        .and_then(Value::as_str)
        .or_else(|| payload.get("message").and_then(Value::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_message_prefers_detail() {
        let err = ApiError::Status {
            status: 422,
            payload: json!({"detail": "bad intent", "message": "other"}),
        };
        assert_eq!(err.message(), Some("bad intent"));
        assert_eq!(err.to_string(), "http 422: bad intent");
    }

    #[test]
    fn test_status_without_body() {
        let err = ApiError::Status { status: 500, payload: Value::Null };
        assert_eq!(err.message(), None);
        assert_eq!(err.to_string(), "http 500: request failed");
    }
}
