//! Retrying transport (decorator pattern)
//!
//! Wraps any `Transport` to retry idempotent GET requests that failed in a
//! way that may succeed on a second attempt.

use crate::error::TransportError;
use crate::transport::{RawResponse, Transport};
use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;

/// Bounded retry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry; doubled for every further retry
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(retry.saturating_sub(1)))
    }
}

/// Transport decorator that retries transient failures
///
/// Retries network failures, timeouts and 5xx responses. 4xx responses and
/// malformed requests are returned immediately. After the last attempt the
/// final outcome is returned as-is, so callers still see the status code or
/// transport error.
#[derive(Debug, Clone)]
pub struct RetryingTransport<T: Transport> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transport> RetryingTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

fn is_transient(outcome: &Result<RawResponse, TransportError>) -> bool {
    match outcome {
        Ok(response) => response.status >= 500,
        Err(TransportError::InvalidRequest { .. }) => false,
        Err(_) => true,
    }
}

#[async_trait]
impl<T: Transport> Transport for RetryingTransport<T> {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<RawResponse, TransportError> {
        let mut outcome = self.inner.get(url, headers).await;

        for retry in 1..=self.policy.max_retries {
            if !is_transient(&outcome) {
                break;
            }

            let delay = self.policy.backoff(retry);
            match &outcome {
                Ok(response) => warn!(
                    "GET {} returned {}, retry {}/{} in {:?}",
                    url, response.status, retry, self.policy.max_retries, delay
                ),
                Err(e) => warn!(
                    "GET {} failed: {}, retry {}/{} in {:?}",
                    url, e, retry, self.policy.max_retries, delay
                ),
            }

            tokio::time::sleep(delay).await;
            outcome = self.inner.get(url, headers).await;
        }

        if is_transient(&outcome) && self.policy.max_retries > 0 {
            debug!("GET {} still failing after {} retries", url, self.policy.max_retries);
        }

        outcome
    }
}
