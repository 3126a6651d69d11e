//! Structured GraphQL error payloads and their classification.
//!
//! NerdGraph does not guarantee a fully structured error taxonomy, so the
//! predicates here are coarse: a substring match for not-found, an
//! `errorClass` match for retryability and a status/vendor-code match for
//! authorization failures. Retry and re-authentication policy stays with the
//! caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::operation::null_as_default;

/// Error classes that mark a structured error as transient.
const RETRYABLE_ERROR_CLASSES: [&str; 3] = ["TIMEOUT", "INTERNAL_SERVER_ERROR", "SERVER_ERROR"];

/// Vendor error code returned for an invalid or missing API key.
const BAD_API_KEY: &str = "BAD_API_KEY";

/// HTTP status for an unauthorized request.
const STATUS_UNAUTHORIZED: u16 = 401;

/// A decode target for the `errors` channel of a GraphQL response.
///
/// The query executor allocates a fresh value with [`ErrorClassifier::new_empty`]
/// for every call, so concurrent requests never share error state.
pub trait ErrorClassifier: std::error::Error + Send + Sync + Sized + 'static {
    /// Produce a fresh, empty classifier.
    fn new_empty() -> Self;

    /// Decode the raw `errors` array of a response envelope into `self`.
    fn decode_errors(&mut self, errors: serde_json::Value) -> Result<(), serde_json::Error>;

    /// Returns `true` if no errors were decoded.
    fn is_empty(&self) -> bool;

    /// Returns `true` if any error reports a missing resource.
    fn is_not_found(&self) -> bool;

    /// Returns `true` if any error carries a transient error class.
    fn is_retryable_error(&self) -> bool;

    /// Returns `true` if the request was rejected for authorization reasons.
    fn is_unauthorized(&self, status: u16) -> bool;
}

/// Response path segment locating the failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphqlPathSegment {
    /// Field name.
    Key(String),
    /// List index.
    Index(i64),
}

impl fmt::Display for GraphqlPathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Per-field validation failure reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Why the value was rejected.
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
}

/// Extension block attached to a NerdGraph error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlErrorExtensions {
    /// Machine-readable code.
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    /// Server-assigned error class (`TIMEOUT`, `SERVER_ERROR`, ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_class: String,
    /// Vendor error code, e.g. `BAD_API_KEY`.
    #[serde(default, rename = "error_code", skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Field validation failures.
    #[serde(default, deserialize_with = "null_as_default")]
    pub validation_errors: Vec<ValidationError>,
}

/// One structured NerdGraph error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlError {
    /// Human-readable error message.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    /// Path within the response where the error occurred.
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: Vec<GraphqlPathSegment>,
    /// Extensions metadata.
    #[serde(default, deserialize_with = "null_as_default")]
    pub extensions: GraphqlErrorExtensions,
}

impl GraphqlError {
    /// Create an error with a message and no extensions.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Attach an error class.
    #[must_use]
    pub fn with_error_class(mut self, error_class: impl Into<String>) -> Self {
        self.extensions.error_class = error_class.into();
        self
    }

    /// Attach a vendor error code.
    #[must_use]
    pub fn with_error_code(mut self, error_code: impl Into<String>) -> Self {
        self.extensions.error_code = Some(error_code.into());
        self
    }
}

/// The `errors` channel of a NerdGraph response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlErrorResponse {
    /// Errors in server order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<GraphqlError>,
}

impl GraphqlErrorResponse {
    /// Wrap a list of errors.
    #[must_use]
    pub const fn new(errors: Vec<GraphqlError>) -> Self {
        Self { errors }
    }

    /// Non-empty messages joined by `", "`.
    #[must_use]
    pub fn message(&self) -> String {
        self.errors
            .iter()
            .map(|err| err.message.as_str())
            .filter(|message| !message.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for GraphqlErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for GraphqlErrorResponse {}

impl ErrorClassifier for GraphqlErrorResponse {
    fn new_empty() -> Self {
        Self::default()
    }

    fn decode_errors(&mut self, errors: serde_json::Value) -> Result<(), serde_json::Error> {
        if errors.is_null() {
            self.errors.clear();
            return Ok(());
        }
        self.errors = serde_json::from_value(errors)?;
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    // Loose by contract: NerdGraph reports missing entities only in the message text.
    fn is_not_found(&self) -> bool {
        self.errors
            .iter()
            .any(|err| err.message.contains("Not Found"))
    }

    fn is_retryable_error(&self) -> bool {
        self.errors.iter().any(|err| {
            RETRYABLE_ERROR_CLASSES.contains(&err.extensions.error_class.as_str())
        })
    }

    fn is_unauthorized(&self, status: u16) -> bool {
        if self.errors.is_empty() {
            return false;
        }
        if status == STATUS_UNAUTHORIZED {
            return true;
        }
        self.errors
            .iter()
            .any(|err| err.extensions.error_code.as_deref() == Some(BAD_API_KEY))
    }
}
