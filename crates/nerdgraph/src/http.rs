//! Default HTTP transport over reqwest.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, RETRY_AFTER, USER_AGENT};
use tracing::{debug, instrument};

use crate::config::{ClientConfig, ENV_API_KEY};
use crate::error::{ConfigError, TransportError, is_retryable_status};
use crate::operation::GraphqlRequest;
use crate::retry::{RetryDecision, RetryPolicy};
use crate::transport::{RawResponse, Transport};

/// Header carrying the NerdGraph user API key.
const API_KEY_HEADER: &str = "api-key";

/// Default user agent.
const DEFAULT_USER_AGENT: &str = concat!("nerdgraph-rs/", env!("CARGO_PKG_VERSION"));

/// Transport metrics.
#[derive(Debug, Default)]
#[allow(clippy::struct_field_names)]
pub struct TransportMetrics {
    requests_total: AtomicU64,
    requests_success: AtomicU64,
    requests_error: AtomicU64,
    requests_retried: AtomicU64,
}

impl TransportMetrics {
    /// Snapshot current metrics.
    #[must_use]
    pub fn snapshot(&self) -> TransportMetricsSnapshot {
        TransportMetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_success: self.requests_success.load(Ordering::Relaxed),
            requests_error: self.requests_error.load(Ordering::Relaxed),
            requests_retried: self.requests_retried.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_field_names)]
pub struct TransportMetricsSnapshot {
    /// Attempts sent, retries included.
    pub requests_total: u64,
    /// Attempts answered with a 2xx status.
    pub requests_success: u64,
    /// Attempts that failed or returned a non-2xx status.
    pub requests_error: u64,
    /// Retries performed.
    pub requests_retried: u64,
}

/// HTTP transport configuration.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Default headers applied to every request.
    pub headers: HeaderMap,
    /// Request timeout.
    pub timeout: Duration,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        Self {
            headers,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

/// HTTP transport builder.
#[derive(Debug, Clone)]
pub struct HttpTransportBuilder {
    endpoint: String,
    config: HttpTransportConfig,
}

impl HttpTransportBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            config: HttpTransportConfig::default(),
        }
    }

    /// Set the user API key sent with every request.
    ///
    /// A key that is not a valid header value is ignored; `from_config`
    /// rejects such keys up front.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl AsRef<str>) -> Self {
        if let Ok(mut value) = HeaderValue::from_str(api_key.as_ref()) {
            value.set_sensitive(true);
            self.config
                .headers
                .insert(HeaderName::from_static(API_KEY_HEADER), value);
        }
        self
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl AsRef<str>) -> Self {
        if let Ok(value) = HeaderValue::from_str(user_agent.as_ref()) {
            self.config.headers.insert(USER_AGENT, value);
        }
        self
    }

    /// Set timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<HttpTransport, TransportError> {
        HttpTransport::with_config(self.endpoint, self.config)
    }
}

/// NerdGraph transport over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    http: reqwest::Client,
    config: HttpTransportConfig,
    metrics: Arc<TransportMetrics>,
}

impl HttpTransport {
    /// Create a transport with custom configuration.
    pub fn with_config(
        endpoint: impl Into<String>,
        config: HttpTransportConfig,
    ) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .default_headers(config.headers.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
            config,
            metrics: Arc::new(TransportMetrics::default()),
        })
    }

    /// Build a transport from client configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let api_key = config.api_key().ok_or(ConfigError::MissingApiKey)?;
        if HeaderValue::from_str(api_key).is_err() {
            return Err(ConfigError::InvalidValue {
                name: ENV_API_KEY.to_string(),
                value: "<redacted>".to_string(),
            });
        }
        let mut builder = HttpTransportBuilder::new(config.endpoint())
            .with_api_key(api_key)
            .with_timeout(config.timeout())
            .with_retry_policy(config.retry_policy());
        if let Some(user_agent) = &config.user_agent {
            builder = builder.with_user_agent(user_agent);
        }
        builder.build().map_err(|err| ConfigError::InvalidValue {
            name: "transport".to_string(),
            value: err.to_string(),
        })
    }

    /// Endpoint this transport posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Return transport metrics snapshot.
    #[must_use]
    pub fn metrics(&self) -> TransportMetricsSnapshot {
        self.metrics.snapshot()
    }

    async fn send_with_retry(
        &self,
        body_bytes: Vec<u8>,
        idempotent: bool,
    ) -> Result<RawResponse, TransportError> {
        let mut attempt = 1;
        loop {
            let (retryable, retry_after, outcome) = match self.send_once(&body_bytes).await {
                Ok(response) => {
                    if response.is_success() || !is_retryable_status(response.status) {
                        return Ok(response);
                    }
                    (true, response.retry_after, Ok(response))
                }
                Err(err) => (err.is_retryable(), None, Err(err)),
            };

            match self
                .config
                .retry
                .decide(retryable, attempt, idempotent, retry_after)
            {
                RetryDecision::RetryAfter(delay) => {
                    self.metrics
                        .requests_retried
                        .fetch_add(1, Ordering::Relaxed);
                    debug!(attempt, ?delay, "retrying NerdGraph request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::DoNotRetry => return outcome,
            }
        }
    }

    async fn send_once(&self, body_bytes: &[u8]) -> Result<RawResponse, TransportError> {
        self.metrics.requests_total.fetch_add(1, Ordering::Relaxed);
        let response = match self
            .http
            .post(&self.endpoint)
            .body(body_bytes.to_vec())
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                self.metrics.requests_error.fetch_add(1, Ordering::Relaxed);
                return Err(err.into());
            }
        };

        let status = response.status().as_u16();
        let retry_after = parse_retry_after(response.headers());
        let raw = RawResponse {
            status,
            body: response.bytes().await?,
            retry_after,
        };

        if raw.is_success() {
            self.metrics
                .requests_success
                .fetch_add(1, Ordering::Relaxed);
        } else {
            self.metrics.requests_error.fetch_add(1, Ordering::Relaxed);
        }
        Ok(raw)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn send(&self, request: &GraphqlRequest) -> Result<RawResponse, TransportError> {
        let body_bytes = serde_json::to_vec(request)?;
        self.send_with_retry(body_bytes, request.is_idempotent())
            .await
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let header = headers.get(RETRY_AFTER)?;
    let value = header.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Truncate a response body for inclusion in an error message.
pub(crate) fn truncate_body(bytes: &[u8]) -> String {
    const MAX_LEN: usize = 4096;
    let mut body = String::from_utf8_lossy(bytes).to_string();
    if body.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_after_parses_seconds_only() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(7)));

        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(3000);
        let truncated = truncate_body(long.as_bytes());
        assert!(truncated.ends_with('…'));
        assert!(truncated.len() <= 4096 + '…'.len_utf8());
    }

    #[test]
    fn api_key_header_is_sensitive() {
        let builder = HttpTransportBuilder::new("http://localhost").with_api_key("NRAK-TEST");
        let value = builder
            .config
            .headers
            .get(API_KEY_HEADER)
            .expect("api key header");
        assert!(value.is_sensitive());
    }

    #[test]
    fn from_config_rejects_key_that_is_not_a_header_value() {
        let err = HttpTransport::from_config(&ClientConfig::new("NRAK-\nINJECTED"))
            .expect_err("invalid key");
        match err {
            ConfigError::InvalidValue { name, value } => {
                assert_eq!(name, ENV_API_KEY);
                assert!(!value.contains("NRAK"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
