//! NerdGraph - typed query execution for the New Relic GraphQL API.
//!
//! This crate provides:
//! - A [`Transport`] seam and a default reqwest-backed [`HttpTransport`].
//! - A stateless [`QueryExecutor`] with cooperative cancellation.
//! - [`GraphqlErrorResponse`], the classifier for structured API errors.
//! - Client configuration and tracing setup.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

mod classifier;
mod config;
mod error;
mod executor;
mod http;
pub mod logging;
mod operation;
mod retry;
mod transport;

pub use classifier::{
    ErrorClassifier, GraphqlError, GraphqlErrorExtensions, GraphqlErrorResponse,
    GraphqlPathSegment, ValidationError,
};
pub use config::{
    ClientConfig, ENV_API_KEY, ENV_GRAPHQL_URL, ENV_REGION, ENV_TIMEOUT_MS, Region, RetryConfig,
};
pub use error::{ConfigError, HttpErrorInfo, QueryError, TransportError, is_retryable_status};
pub use executor::{QueryExecutor, decode_response};
pub use http::{
    HttpTransport, HttpTransportBuilder, HttpTransportConfig, TransportMetrics,
    TransportMetricsSnapshot,
};
pub use operation::{GraphqlQuery, GraphqlRequest, GraphqlResponse, Variables, null_as_default};
pub use retry::{RetryDecision, RetryPolicy, RetryStrategy};
pub use transport::{RawResponse, Transport};

pub use tokio_util::sync::CancellationToken;
