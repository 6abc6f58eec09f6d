//! Client error types.

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::{Map, Value};

use crate::rate_limit::RateLimitInfo;

/// Result type for Pxshot client operations.
pub type Result<T> = std::result::Result<T, PxshotError>;

/// Field name to list of messages, as reported by validation failures.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Errors that can occur when using the Pxshot client.
#[derive(Debug, thiserror::Error)]
pub enum PxshotError {
    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request was rejected, locally or by the server (422).
    #[error("validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
        /// Per-field error messages.
        errors: FieldErrors,
        /// HTTP status code, absent when rejected before sending.
        status: Option<u16>,
    },

    /// The API key was rejected (401).
    #[error("authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
        /// Rate limit info from the response.
        rate_limit: RateLimitInfo,
    },

    /// Too many requests (429).
    #[error("rate limit exceeded: {message}")]
    RateLimit {
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
        /// Rate limit info from the response.
        rate_limit: RateLimitInfo,
    },

    /// Server returned any other error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
        /// Rate limit info from the response.
        rate_limit: RateLimitInfo,
    },

    /// The request could not be completed (network, timeout, bad body).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl PxshotError {
    /// Validation error raised before any request is sent.
    pub(crate) fn missing_field(field: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(
            field.to_string(),
            vec![format!("The {field} field is required")],
        );
        Self::Validation {
            message: format!("{field} is required"),
            errors,
            status: None,
        }
    }

    /// Map an error response to a typed error.
    ///
    /// `body` is the raw response body; anything that does not decode to a
    /// JSON object is treated as an empty object.
    #[must_use]
    pub fn from_response(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Self {
        let rate_limit = RateLimitInfo::from_headers(headers);
        let body: Map<String, Value> = serde_json::from_slice(body).unwrap_or_default();

        let message = ["message", "error"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .map_or_else(|| format!("HTTP {status}"), ToString::to_string);
        let code = status.as_u16();

        match status {
            StatusCode::UNAUTHORIZED => Self::Authentication {
                message,
                status: code,
                rate_limit,
            },
            StatusCode::UNPROCESSABLE_ENTITY => Self::Validation {
                message,
                errors: body
                    .get("errors")
                    .map(field_errors)
                    .unwrap_or_default(),
                status: Some(code),
            },
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimit {
                message,
                status: code,
                rate_limit,
            },
            _ => Self::Api {
                message,
                status: code,
                rate_limit,
            },
        }
    }

    /// HTTP status code of the response that caused this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Configuration(_) => None,
            Self::Validation { status, .. } => *status,
            Self::Authentication { status, .. }
            | Self::RateLimit { status, .. }
            | Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// Rate limit info attached to this error, if the kind carries it.
    #[must_use]
    pub fn rate_limit_info(&self) -> Option<&RateLimitInfo> {
        match self {
            Self::Authentication { rate_limit, .. }
            | Self::RateLimit { rate_limit, .. }
            | Self::Api { rate_limit, .. } => Some(rate_limit),
            _ => None,
        }
    }

    /// Seconds to wait before retrying, for rate limit errors.
    #[must_use]
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { rate_limit, .. } => rate_limit.retry_after(),
            _ => None,
        }
    }

    /// Per-field messages, for validation errors.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

/// Read the `errors` member of a 422 body.
///
/// Single strings are accepted in place of a list; entries of any other
/// shape are skipped.
fn field_errors(value: &Value) -> FieldErrors {
    let Some(object) = value.as_object() else {
        return FieldErrors::new();
    };

    object
        .iter()
        .filter_map(|(field, messages)| {
            let messages = match messages {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(|item| item.as_str().map(ToString::to_string))
                    .collect(),
                _ => return None,
            };
            Some((field.clone(), messages))
        })
        .collect()
}
