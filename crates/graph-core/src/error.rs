//! Error types for Graph operations.
//!
//! This module provides the error type shared by Graph client crates, the
//! mapping from HTTP status codes to error variants, and the coarse
//! [`ErrorCategory`] taxonomy callers can branch on.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Main error type for Graph operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Token acquisition failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The remote rejected the bearer token (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The token lacks a required permission (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request with details
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The remote throttled the request (429)
    #[error("Throttled: {0}")]
    Throttled(String),

    /// Graph is unavailable or returned a server error
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Operation timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// A response body could not be read or decoded
    #[error("Failed to decode response: {0}")]
    Decoding(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for Graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The token provider could not supply a token.
    Authentication,
    /// The request failed on the network or with a non-success status.
    Transport,
    /// The response payload could not be read or parsed.
    Decoding,
    /// The client was configured with invalid settings.
    Configuration,
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "AUTHENTICATION_FAILED",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Throttled(_) => "THROTTLED",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Timeout(_) => "TIMEOUT",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Decoding(_) => "DECODING_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Returns the category this error belongs to.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::Unauthorized(_)
            | Self::Forbidden(_)
            | Self::NotFound(_)
            | Self::BadRequest(_)
            | Self::Throttled(_)
            | Self::ServiceUnavailable(_)
            | Self::Timeout(_)
            | Self::HttpError(_) => ErrorCategory::Transport,
            Self::Decoding(_) => ErrorCategory::Decoding,
            Self::ConfigError(_) | Self::InvalidEndpoint(_) => ErrorCategory::Configuration,
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Authentication(_)
                | Self::ServiceUnavailable(_)
                | Self::Decoding(_)
                | Self::ConfigError(_)
        )
    }
}

/// Graph error envelope: `{"error": {"code": "...", "message": "..."}}`.
#[derive(Debug, Deserialize)]
struct GraphErrorEnvelope {
    error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Extracts a readable message from a Graph error body, falling back to the raw text.
fn graph_error_message(text: &str) -> String {
    match serde_json::from_str::<GraphErrorEnvelope>(text) {
        Ok(GraphErrorEnvelope { error }) => match (error.code, error.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (None, Some(message)) => message,
            (Some(code), None) => code,
            (None, None) => text.to_string(),
        },
        Err(_) if text.is_empty() => "no response body".to_string(),
        Err(_) => text.to_string(),
    }
}

/// Maps a non-success HTTP status and its body to an [`Error`].
#[must_use]
pub fn map_status_to_error(status: StatusCode, text: &str) -> Error {
    let message = graph_error_message(text);
    match status {
        StatusCode::UNAUTHORIZED => Error::Unauthorized(message),
        StatusCode::FORBIDDEN => Error::Forbidden(message),
        StatusCode::NOT_FOUND => Error::NotFound(message),
        StatusCode::BAD_REQUEST => Error::BadRequest(message),
        StatusCode::TOO_MANY_REQUESTS => Error::Throttled(message),
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("Graph temporarily unavailable: {message}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("Graph server error {status}: {message}"))
        }
        _ => Error::HttpError(format!("Graph error {status}: {message}")),
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() || err.is_body() {
            Self::Decoding(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decoding(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decoding(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(format!("Invalid configuration: {err}"))
    }
}
