use crate::error_code::{map_error, ErrorKind};
use crate::transport::TransportError;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Parameter or configuration key that caused the error (e.g., "batch_size", "config.token")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected range, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "batch_validator", "request_executor")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A non-success response from the service, classified into an [`ErrorKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (HTTP {status}){}", describe(.error_code, .detail))]
pub struct ResponseError {
    pub kind: ErrorKind,
    pub status: u16,
    pub error_code: Option<String>,
    pub detail: Option<String>,
    /// Only set for [`ErrorKind::PlanRateLimitError`].
    pub seconds_to_wait: Option<u64>,
}

static SECONDS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+) seconds").expect("static wait pattern"));

/// Extracts `N` from a service message such as "Request was throttled, available in 45 seconds".
pub(crate) fn seconds_in_detail(detail: &str) -> Option<u64> {
    SECONDS_PATTERN
        .captures(detail)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn describe(error_code: &Option<String>, detail: &Option<String>) -> String {
    match (error_code, detail) {
        (Some(code), Some(detail)) => format!(": {}: {}", code, detail),
        (Some(code), None) => format!(": {}", code),
        (None, Some(detail)) => format!(": {}", detail),
        (None, None) => String::new(),
    }
}

impl ResponseError {
    /// Builds a typed error from a status code and the raw (possibly empty or
    /// malformed) response body. Never fails.
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        let json: Option<serde_json::Value> = serde_json::from_slice(body).ok();
        let field = |name: &str| -> Option<String> {
            json.as_ref()?.get(name).and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Null => None,
                other => Some(other.to_string()),
            })
        };

        let detail = field("detail");
        let error_code = field("error_code");
        let kind = map_error(status, error_code.as_deref());

        let seconds_to_wait = if kind == ErrorKind::PlanRateLimitError {
            detail
                .as_deref()
                .and_then(seconds_in_detail)
                .or_else(|| field("seconds_to_wait").and_then(|s| s.trim().parse().ok()))
        } else {
            None
        };

        Self {
            kind,
            status,
            error_code,
            detail,
            seconds_to_wait,
        }
    }
}

/// Unified error type for the MonkeyLearn client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Runtime error: {message}{}", format_context(.context))]
    Runtime {
        message: String,
        context: ErrorContext,
    },

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Request cancelled: {message}")]
    Cancelled { message: String },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Create a new runtime error with structured context
    pub fn runtime_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Runtime {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. }
            | Error::Validation { context, .. }
            | Error::Runtime { context, .. } => Some(context),
            _ => None,
        }
    }

    /// The typed service error, if this error came from a non-success response.
    pub fn response(&self) -> Option<&ResponseError> {
        match self {
            Error::Response(e) => Some(e),
            _ => None,
        }
    }

    /// Shorthand for `self.response().map(|e| e.kind)`.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.response().map(|e| e.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_error_from_body() {
        let body = br#"{"detail": "Model not found", "error_code": "MODEL_NOT_FOUND"}"#;
        let err = ResponseError::from_body(404, body);
        assert_eq!(err.kind, ErrorKind::ModelNotFound);
        assert_eq!(err.status, 404);
        assert_eq!(err.error_code.as_deref(), Some("MODEL_NOT_FOUND"));
        assert_eq!(err.detail.as_deref(), Some("Model not found"));
        assert_eq!(err.seconds_to_wait, None);
    }

    #[test]
    fn test_undecodable_body_keeps_status_mapping() {
        let err = ResponseError::from_body(500, b"<html>Bad Gateway</html>");
        assert_eq!(err.kind, ErrorKind::GenericResponseError);
        assert_eq!(err.detail, None);
        assert_eq!(err.error_code, None);

        let err = ResponseError::from_body(401, b"");
        assert_eq!(err.kind, ErrorKind::AuthenticationError);
    }

    #[test]
    fn test_plan_rate_limit_seconds_from_detail() {
        let body = br#"{"detail": "Request was throttled. Expected available in 45 seconds.", "error_code": "PLAN_RATE_LIMIT"}"#;
        let err = ResponseError::from_body(429, body);
        assert_eq!(err.kind, ErrorKind::PlanRateLimitError);
        assert_eq!(err.seconds_to_wait, Some(45));
    }

    #[test]
    fn test_plan_rate_limit_seconds_from_body_field() {
        let body = br#"{"detail": "Slow down", "error_code": "PLAN_RATE_LIMIT", "seconds_to_wait": 12}"#;
        let err = ResponseError::from_body(429, body);
        assert_eq!(err.seconds_to_wait, Some(12));
    }

    #[test]
    fn test_seconds_only_on_plan_rate_limit() {
        let body = br#"{"detail": "available in 45 seconds", "error_code": "CONCURRENCY_RATE_LIMIT"}"#;
        let err = ResponseError::from_body(429, body);
        assert_eq!(err.kind, ErrorKind::ConcurrencyRateLimitError);
        assert_eq!(err.seconds_to_wait, None);
    }

    #[test]
    fn test_seconds_in_detail() {
        assert_eq!(seconds_in_detail("available in 3 seconds"), Some(3));
        assert_eq!(seconds_in_detail("available soon"), None);
        assert_eq!(seconds_in_detail("in 1 second"), None);
    }

    #[test]
    fn test_display_includes_code_and_detail() {
        let err = ResponseError::from_body(
            403,
            br#"{"detail": "Limit reached", "error_code": "MODEL_LIMIT"}"#,
        );
        assert_eq!(
            err.to_string(),
            "ModelLimitError (HTTP 403): MODEL_LIMIT: Limit reached"
        );
        let wrapped: Error = err.into();
        assert_eq!(wrapped.kind(), Some(ErrorKind::ModelLimitError));
    }

    #[test]
    fn test_context_display() {
        let err = Error::validation_with_context(
            "batch_size is too big",
            ErrorContext::new()
                .with_field_path("batch_size")
                .with_source("batch_validator"),
        );
        assert_eq!(
            err.to_string(),
            "Validation error: batch_size is too big (field: batch_size, source: batch_validator)"
        );
        assert!(err.context().is_some());
        assert!(err.kind().is_none());
    }
}
