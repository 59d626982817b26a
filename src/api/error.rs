//! Error type for calls against the JoinMatch backend.
//!
//! Every failure of a page fetch, search dispatch or moderator action is an
//! [`ApiError`]. Callers decide how to present it; nothing at this layer
//! retries.

use std::fmt;

use http::StatusCode;
use serde::Deserialize;

/// Longest raw body excerpt kept in an error message.
const MAX_BODY_EXCERPT: usize = 200;

/// Broad category of an API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// No response was received (connect failure, timeout, broken body).
    Network,
    /// The server answered with a non-2xx status.
    HttpStatus,
    /// The server answered 2xx but the body was not the expected JSON.
    Decode,
    /// The request could not be built (bad URL, unusable token).
    Request,
}

/// A failed backend call.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status code, if a response arrived
    pub status: Option<StatusCode>,
    /// Human-readable error message
    pub message: String,
}

/// Error body shape used by the backend for most failures.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            status: None,
            message: message.into(),
        }
    }

    pub fn http_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::HttpStatus,
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            status: None,
            message: message.into(),
        }
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Request,
            status: None,
            message: message.into(),
        }
    }

    /// Build an error from a non-2xx response.
    ///
    /// Prefers the JSON `message` (or `error`) field of the body, then a
    /// trimmed excerpt of the raw body, then the canonical status reason.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let parsed = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty());

        let message = match parsed {
            Some(m) => m,
            None => {
                let text = String::from_utf8_lossy(body);
                let text = text.trim();
                if text.is_empty() {
                    status.canonical_reason().unwrap_or("Unknown").to_string()
                } else {
                    text.chars().take(MAX_BODY_EXCERPT).collect()
                }
            }
        };

        Self::http_status(status, message)
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status.map(|s| s.as_u16())
    }

    /// Network failures and 5xx responses may succeed when repeated.
    pub fn is_transient(&self) -> bool {
        match self.kind {
            ApiErrorKind::Network => true,
            ApiErrorKind::HttpStatus => self.status.is_some_and(|s| s.is_server_error()),
            ApiErrorKind::Decode | ApiErrorKind::Request => false,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status,
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.status) {
            (ApiErrorKind::HttpStatus, Some(status)) => {
                write!(f, "HTTP {}: {}", status.as_u16(), self.message)
            }
            (ApiErrorKind::Network, _) => write!(f, "network error: {}", self.message),
            (ApiErrorKind::Decode, _) => write!(f, "unexpected response: {}", self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_uses_json_message() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            br#"{"message":"city is required","status":400}"#,
        );
        assert_eq!(err.kind, ApiErrorKind::HttpStatus);
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.message, "city is required");
        assert_eq!(err.to_string(), "HTTP 400: city is required");
    }

    #[test]
    fn test_from_response_falls_back_to_error_field() {
        let err = ApiError::from_response(StatusCode::FORBIDDEN, br#"{"error":"Forbidden"}"#);
        assert_eq!(err.message, "Forbidden");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_from_response_plain_text_and_empty() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, b"  upstream down \n");
        assert_eq!(err.message, "upstream down");
        assert!(err.is_transient());

        let err = ApiError::from_response(StatusCode::NOT_FOUND, b"");
        assert_eq!(err.message, "Not Found");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(1000);
        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, body.as_bytes());
        assert_eq!(err.message.len(), MAX_BODY_EXCERPT);
    }

    #[test]
    fn test_display_per_kind() {
        assert_eq!(
            ApiError::network("connection refused").to_string(),
            "network error: connection refused"
        );
        assert_eq!(
            ApiError::decode("missing field `last`").to_string(),
            "unexpected response: missing field `last`"
        );
        assert!(ApiError::network("x").is_transient());
        assert!(!ApiError::decode("x").is_transient());
    }
}
