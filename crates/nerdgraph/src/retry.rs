//! Transport-level retry policy.
//!
//! Only the HTTP transport consults this. The query executor never retries;
//! callers drive their own retry loop from the error classifier.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Retry decision result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after a delay.
    RetryAfter(Duration),
    /// Do not retry.
    DoNotRetry,
}

/// Retry strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryStrategy {
    /// Never retry.
    Never,
    /// Retry queries only; mutations are sent once.
    #[default]
    IdempotentOnly,
    /// Retry regardless of idempotency.
    Always,
}

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    pub max_attempts: usize,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Maximum jitter to add to delays.
    pub max_jitter: Duration,
    /// Retry strategy.
    pub strategy: RetryStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            max_jitter: Duration::from_millis(150),
            strategy: RetryStrategy::IdempotentOnly,
        }
    }
}

impl RetryPolicy {
    /// A policy that sends every request exactly once.
    #[must_use]
    pub fn never() -> Self {
        Self {
            max_attempts: 1,
            strategy: RetryStrategy::Never,
            ..Self::default()
        }
    }

    /// Decide whether to retry a failed attempt.
    ///
    /// `retry_after` from the server, when present, replaces the computed
    /// backoff but is still capped at `max_delay`.
    #[must_use]
    pub fn decide(
        &self,
        retryable: bool,
        attempt: usize,
        idempotent: bool,
        retry_after: Option<Duration>,
    ) -> RetryDecision {
        if attempt >= self.max_attempts || !retryable {
            return RetryDecision::DoNotRetry;
        }

        match self.strategy {
            RetryStrategy::Never => RetryDecision::DoNotRetry,
            RetryStrategy::IdempotentOnly if !idempotent => RetryDecision::DoNotRetry,
            _ => {
                if let Some(hint) = retry_after {
                    return RetryDecision::RetryAfter(hint.min(self.max_delay));
                }
                let base_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
                let exp = 2_u64
                    .saturating_pow(u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX));
                let max_ms = u64::try_from(self.max_delay.as_millis()).unwrap_or(u64::MAX);
                let delay_ms = base_ms.saturating_mul(exp).min(max_ms);
                let jitter_ms = if self.max_jitter.is_zero() {
                    0
                } else {
                    let jitter_max = u64::try_from(self.max_jitter.as_millis()).unwrap_or(u64::MAX);
                    rand::thread_rng().gen_range(0..=jitter_max)
                };
                RetryDecision::RetryAfter(Duration::from_millis(delay_ms.saturating_add(jitter_ms)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_jitter() -> RetryPolicy {
        RetryPolicy {
            max_jitter: Duration::ZERO,
            ..RetryPolicy::default()
        }
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = no_jitter();
        assert_eq!(
            policy.decide(true, 1, true, None),
            RetryDecision::RetryAfter(Duration::from_millis(200))
        );
        assert_eq!(
            policy.decide(true, 2, true, None),
            RetryDecision::RetryAfter(Duration::from_millis(400))
        );
        assert_eq!(policy.decide(true, 3, true, None), RetryDecision::DoNotRetry);
    }

    #[test]
    fn mutations_are_not_retried_by_default() {
        assert_eq!(
            no_jitter().decide(true, 1, false, None),
            RetryDecision::DoNotRetry
        );
    }

    #[test]
    fn non_retryable_failures_stop_immediately() {
        assert_eq!(
            no_jitter().decide(false, 1, true, None),
            RetryDecision::DoNotRetry
        );
    }

    #[test]
    fn retry_after_hint_is_capped() {
        let policy = no_jitter();
        assert_eq!(
            policy.decide(true, 1, true, Some(Duration::from_secs(60))),
            RetryDecision::RetryAfter(Duration::from_secs(5))
        );
    }

    #[test]
    fn never_policy_sends_once() {
        assert_eq!(
            RetryPolicy::never().decide(true, 1, true, None),
            RetryDecision::DoNotRetry
        );
    }
}
