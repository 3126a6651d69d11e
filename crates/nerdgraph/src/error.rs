//! Error types for transport, query execution and configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classifier::{ErrorClassifier, GraphqlErrorResponse};

/// HTTP error information captured from reqwest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpErrorInfo {
    /// Error message.
    pub message: String,
    /// HTTP status code (if available).
    pub status_code: Option<u16>,
    /// Whether the error was a timeout.
    pub is_timeout: bool,
    /// Whether the error was a connection failure.
    pub is_connect: bool,
    /// Whether the error was a request error.
    pub is_request: bool,
}

impl From<reqwest::Error> for HttpErrorInfo {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            status_code: err.status().map(|status| status.as_u16()),
            is_timeout: err.is_timeout(),
            is_connect: err.is_connect(),
            is_request: err.is_request(),
        }
    }
}

/// Failure below the GraphQL layer: network, HTTP status or envelope decoding.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// HTTP/network error.
    #[error("HTTP error: {}", .0.message)]
    Http(HttpErrorInfo),

    /// Non-success HTTP status without a GraphQL error payload.
    #[error("HTTP status {status} with body: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated if needed).
        body: String,
        /// Retry-After duration when supplied.
        retry_after: Option<Duration>,
    },

    /// The response envelope or its data could not be decoded.
    #[error("JSON error: {0}")]
    Json(String),

    /// Transport could not be constructed or used.
    #[error("transport error: {message}")]
    Other {
        /// Details.
        message: String,
    },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(HttpErrorInfo::from(err))
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl TransportError {
    /// Returns `true` if the error is worth retrying by kind.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Http(info) => info.is_timeout || info.is_connect || info.is_request,
            Self::HttpStatus { status, .. } => is_retryable_status(*status),
            Self::Json(_) | Self::Other { .. } => false,
        }
    }

    /// HTTP status attached to the failure, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http(info) => info.status_code,
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Json(_) | Self::Other { .. } => None,
        }
    }
}

/// Returns `true` for HTTP statuses that usually clear up on retry.
#[must_use]
pub const fn is_retryable_status(status: u16) -> bool {
    status == 429 || (status >= 500 && status < 600)
}

/// Error returned by the query executor.
///
/// Structured API errors carry the classifier that decoded them, so callers
/// can ask the `is_*` questions without re-parsing the payload.
#[derive(Debug, Error)]
pub enum QueryError<E: ErrorClassifier = GraphqlErrorResponse> {
    /// Transport failure, surfaced unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Non-empty `errors` array in the response.
    #[error("{errors}")]
    Api {
        /// Classified errors.
        errors: E,
        /// HTTP status of the response carrying them.
        status: u16,
    },

    /// The caller's cancellation token fired before the call completed.
    #[error("query cancelled")]
    Cancelled,

    /// Well-formed envelope that violates the GraphQL response contract.
    #[error("GraphQL protocol error: {message}")]
    Protocol {
        /// Details.
        message: String,
    },
}

impl<E: ErrorClassifier> QueryError<E> {
    /// Returns `true` if the server reported a missing resource.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { errors, .. } => errors.is_not_found(),
            _ => false,
        }
    }

    /// Returns `true` if the failure is transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_retryable(),
            Self::Api { errors, .. } => errors.is_retryable_error(),
            Self::Cancelled | Self::Protocol { .. } => false,
        }
    }

    /// Returns `true` if the credentials were rejected.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api { errors, status } => errors.is_unauthorized(*status),
            Self::Transport(err) => err.status() == Some(401),
            Self::Cancelled | Self::Protocol { .. } => false,
        }
    }

    /// Returns `true` if the caller cancelled the call.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Structured errors, when the server returned any.
    #[must_use]
    pub const fn api_errors(&self) -> Option<&E> {
        match self {
            Self::Api { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No API key was configured.
    #[error("missing API key (set NEW_RELIC_API_KEY)")]
    MissingApiKey,

    /// Unknown region name.
    #[error("unknown region: {0}")]
    InvalidRegion(String),

    /// A setting could not be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidValue {
        /// Setting name.
        name: String,
        /// Offending value.
        value: String,
    },
}
