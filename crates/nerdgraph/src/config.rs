//! Client configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::retry::{RetryPolicy, RetryStrategy};

/// Environment variable holding the user API key.
pub const ENV_API_KEY: &str = "NEW_RELIC_API_KEY";
/// Environment variable selecting the region.
pub const ENV_REGION: &str = "NEW_RELIC_REGION";
/// Environment variable overriding the GraphQL endpoint.
pub const ENV_GRAPHQL_URL: &str = "NEW_RELIC_GRAPHQL_URL";
/// Environment variable overriding the request timeout, in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "NEW_RELIC_TIMEOUT_MS";

/// NerdGraph data region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    /// United States (default).
    #[default]
    Us,
    /// European Union.
    Eu,
}

impl Region {
    /// GraphQL endpoint for the region.
    #[must_use]
    pub const fn graphql_url(self) -> &'static str {
        match self {
            Self::Us => "https://api.newrelic.com/graphql",
            Self::Eu => "https://api.eu.newrelic.com/graphql",
        }
    }
}

impl FromStr for Region {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "US" => Ok(Self::Us),
            "EU" => Ok(Self::Eu),
            _ => Err(ConfigError::InvalidRegion(s.to_string())),
        }
    }
}

/// Transport retry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum attempts, including the first.
    pub max_attempts: usize,
    /// Base backoff delay in milliseconds.
    pub base_delay_ms: u64,
    /// Backoff ceiling in milliseconds.
    pub max_delay_ms: u64,
    /// Retry strategy.
    pub strategy: RetryStrategy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            base_delay_ms: u64::try_from(policy.base_delay.as_millis()).unwrap_or(u64::MAX),
            max_delay_ms: u64::try_from(policy.max_delay.as_millis()).unwrap_or(u64::MAX),
            strategy: policy.strategy,
        }
    }
}

/// NerdGraph client configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// User API key.
    pub api_key: Option<String>,
    /// Data region.
    pub region: Region,
    /// Explicit endpoint, overriding the region.
    pub graphql_url: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent override.
    pub user_agent: Option<String>,
    /// Transport retry settings.
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            region: Region::Us,
            graphql_url: None,
            timeout_ms: 30_000,
            user_agent: None,
            retry: RetryConfig::default(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("region", &self.region)
            .field("graphql_url", &self.graphql_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration for an API key with default settings.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.api_key = lookup(ENV_API_KEY).filter(|key| !key.trim().is_empty());
        if config.api_key.is_none() {
            return Err(ConfigError::MissingApiKey);
        }
        if let Some(region) = lookup(ENV_REGION).filter(|value| !value.trim().is_empty()) {
            config.region = region.parse()?;
        }
        config.graphql_url = lookup(ENV_GRAPHQL_URL).filter(|url| !url.trim().is_empty());
        if let Some(timeout) = lookup(ENV_TIMEOUT_MS) {
            config.timeout_ms =
                timeout
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        name: ENV_TIMEOUT_MS.to_string(),
                        value: timeout.clone(),
                    })?;
        }
        Ok(config)
    }

    /// Select a region.
    #[must_use]
    pub const fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Override the endpoint.
    #[must_use]
    pub fn with_graphql_url(mut self, url: impl Into<String>) -> Self {
        self.graphql_url = Some(url.into());
        self
    }

    /// Configured API key.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Effective endpoint: the override, else the region's.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.graphql_url
            .as_deref()
            .unwrap_or_else(|| self.region.graphql_url())
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Transport retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts.max(1),
            base_delay: Duration::from_millis(self.retry.base_delay_ms),
            max_delay: Duration::from_millis(self.retry.max_delay_ms),
            strategy: self.retry.strategy,
            ..RetryPolicy::default()
        }
    }
}
