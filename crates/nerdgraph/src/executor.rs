//! Query execution: request building, cancellation and error classification.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::classifier::{ErrorClassifier, GraphqlErrorResponse};
use crate::error::{QueryError, TransportError};
use crate::http::truncate_body;
use crate::operation::{GraphqlQuery, GraphqlRequest, GraphqlResponse, Variables};
use crate::transport::{RawResponse, Transport};

/// Runs one GraphQL request per call against a shared transport.
///
/// The executor holds no per-call state: every invocation builds its own
/// request and its own error classifier. It never retries.
#[derive(Clone)]
pub struct QueryExecutor {
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryExecutor").finish_non_exhaustive()
    }
}

impl QueryExecutor {
    /// Create an executor over a transport.
    pub fn new<T: Transport + 'static>(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Execute a document and decode `data` into `T`.
    ///
    /// Structured errors are classified by [`GraphqlErrorResponse`].
    pub async fn execute<T>(
        &self,
        cancel: &CancellationToken,
        query: &str,
        variables: Variables,
    ) -> Result<T, QueryError>
    where
        T: DeserializeOwned,
    {
        self.execute_with_classifier::<T, GraphqlErrorResponse>(cancel, query, variables)
            .await
    }

    /// Execute a document with a custom error classifier.
    ///
    /// Cancelling `cancel` drops the in-flight transport future and returns
    /// [`QueryError::Cancelled`].
    #[instrument(skip_all, fields(mutation = tracing::field::Empty))]
    pub async fn execute_with_classifier<T, E>(
        &self,
        cancel: &CancellationToken,
        query: &str,
        variables: Variables,
    ) -> Result<T, QueryError<E>>
    where
        T: DeserializeOwned,
        E: ErrorClassifier,
    {
        let request = GraphqlRequest::new(GraphqlQuery::new(query), variables);
        tracing::Span::current().record("mutation", request.query.is_mutation());

        if cancel.is_cancelled() {
            return Err(QueryError::Cancelled);
        }

        let raw = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("NerdGraph request cancelled");
                return Err(QueryError::Cancelled);
            }
            result = self.transport.send(&request) => result?,
        };

        decode_response(&raw)
    }
}

/// Decode a raw response into `T`, or classify its errors into `E`.
pub fn decode_response<T, E>(raw: &RawResponse) -> Result<T, QueryError<E>>
where
    T: DeserializeOwned,
    E: ErrorClassifier,
{
    let envelope: GraphqlResponse = match serde_json::from_slice(&raw.body) {
        Ok(envelope) => envelope,
        Err(_) if !raw.is_success() => return Err(status_error(raw).into()),
        Err(err) => return Err(TransportError::from(err).into()),
    };

    let mut classifier = E::new_empty();
    if envelope.has_errors() {
        if let Some(errors) = envelope.errors {
            classifier
                .decode_errors(errors)
                .map_err(TransportError::from)?;
        }
    }
    if !classifier.is_empty() {
        warn!(status = raw.status, errors = %classifier, "NerdGraph returned errors");
        return Err(QueryError::Api {
            errors: classifier,
            status: raw.status,
        });
    }

    if !raw.is_success() {
        return Err(status_error(raw).into());
    }

    let data = envelope
        .data
        .filter(|data| !data.is_null())
        .ok_or_else(|| QueryError::Protocol {
            message: "missing GraphQL data".to_string(),
        })?;
    serde_json::from_value(data).map_err(|err| TransportError::from(err).into())
}

fn status_error(raw: &RawResponse) -> TransportError {
    TransportError::HttpStatus {
        status: raw.status,
        body: truncate_body(&raw.body),
        retry_after: raw.retry_after,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq, Eq)]
    struct Viewer {
        id: String,
    }

    fn raw(status: u16, body: serde_json::Value) -> RawResponse {
        RawResponse::new(status, body.to_string())
    }

    #[test]
    fn decodes_success_data() {
        let viewer: Viewer = decode_response::<Viewer, GraphqlErrorResponse>(&raw(
            200,
            serde_json::json!({"data": {"id": "42"}}),
        ))
        .expect("data");
        assert_eq!(viewer, Viewer { id: "42".into() });
    }

    #[test]
    fn classifies_error_payload() {
        let err = decode_response::<Viewer, GraphqlErrorResponse>(&raw(
            200,
            serde_json::json!({
                "data": null,
                "errors": [{"message": "boom", "extensions": {"errorClass": "SERVER_ERROR"}}]
            }),
        ))
        .expect_err("classified");
        assert!(err.is_retryable());
        assert_eq!(err.api_errors().map(|e| e.errors.len()), Some(1));
    }

    #[test]
    fn error_payload_on_401_is_unauthorized() {
        let err = decode_response::<Viewer, GraphqlErrorResponse>(&raw(
            401,
            serde_json::json!({"errors": [{"message": "Unauthorized"}]}),
        ))
        .expect_err("classified");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn null_error_members_keep_unauthorized_classification() {
        let err = decode_response::<Viewer, GraphqlErrorResponse>(&raw(
            401,
            serde_json::json!({
                "errors": [{"message": "Invalid API key", "path": null, "extensions": null}]
            }),
        ))
        .expect_err("classified");
        assert!(matches!(err, QueryError::Api { status: 401, .. }));
        assert!(err.is_unauthorized());
    }

    #[test]
    fn null_validation_errors_keep_retryable_classification() {
        let err = decode_response::<Viewer, GraphqlErrorResponse>(&raw(
            200,
            serde_json::json!({
                "errors": [{
                    "message": "boom",
                    "extensions": {"errorClass": "TIMEOUT", "validationErrors": null}
                }]
            }),
        ))
        .expect_err("classified");
        assert!(err.api_errors().is_some());
        assert!(err.is_retryable());
    }

    #[test]
    fn empty_errors_array_is_success() {
        let viewer = decode_response::<Viewer, GraphqlErrorResponse>(&raw(
            200,
            serde_json::json!({"data": {"id": "7"}, "errors": []}),
        ))
        .expect("data");
        assert_eq!(viewer.id, "7");
    }

    #[test]
    fn malformed_envelope_is_transport_error() {
        let err = decode_response::<Viewer, GraphqlErrorResponse>(&RawResponse::new(
            200,
            "not json",
        ))
        .expect_err("malformed");
        assert!(matches!(err, QueryError::Transport(TransportError::Json(_))));
    }

    #[test]
    fn non_json_error_status_is_http_status_error() {
        let err = decode_response::<Viewer, GraphqlErrorResponse>(&RawResponse::new(
            502,
            "<html>bad gateway</html>",
        ))
        .expect_err("status");
        assert!(matches!(
            err,
            QueryError::Transport(TransportError::HttpStatus { status: 502, .. })
        ));
        assert!(err.is_retryable());
    }

    #[test]
    fn missing_data_is_protocol_error() {
        let err = decode_response::<Viewer, GraphqlErrorResponse>(&raw(
            200,
            serde_json::json!({}),
        ))
        .expect_err("no data");
        assert!(matches!(err, QueryError::Protocol { .. }));
    }
}
