//! The seam between query execution and the network.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::TransportError;
use crate::operation::GraphqlRequest;

/// Raw transport response: HTTP status and undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Bytes,
    /// Retry-After hint, if the server sent one.
    pub retry_after: Option<Duration>,
}

impl RawResponse {
    /// Create a response from a status and body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            retry_after: None,
        }
    }

    /// Create a `200 OK` response with a JSON body.
    #[must_use]
    pub fn ok_json(value: &serde_json::Value) -> Self {
        Self::new(200, value.to_string())
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Executes GraphQL requests against a NerdGraph endpoint.
///
/// Implementations own authentication, connection pooling and any
/// transport-level retries. Dropping the returned future must abort the
/// in-flight call; the query executor relies on this for cancellation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the raw response.
    async fn send(&self, request: &GraphqlRequest) -> Result<RawResponse, TransportError>;
}
