//! Bounded retries with exponential backoff for store calls.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::store::StoreError;

/// Retry policy applied by the gateway to every store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub max_attempts: u32,
    /// Backoff before the first retry.
    pub base_delay: Duration,
    /// Upper bound on any single backoff.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Backoff before retry number `retry` (zero-based).
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay
            .saturating_mul(1_u32 << retry.min(16))
            .min(self.max_delay)
    }

    /// Run an idempotent `call` until it succeeds, fails permanently, or
    /// attempts run out. Failures with an unknown outcome are retried.
    pub async fn run<T, F, Fut>(&self, operation: &str, call: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        self.run_with(operation, StoreError::is_retryable_if_idempotent, call)
            .await
    }

    /// Run a `call` that must not be repeated once applied. Only failures
    /// that guarantee the request was rejected are retried.
    pub async fn run_once_applied<T, F, Fut>(
        &self,
        operation: &str,
        call: F,
    ) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        self.run_with(operation, StoreError::is_transient, call).await
    }

    async fn run_with<T, F, Fut>(
        &self,
        operation: &str,
        retryable: fn(&StoreError) -> bool,
        mut call: F,
    ) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if retryable(&err) && attempt < max_attempts => {
                    let delay = self.delay_for(attempt - 1);
                    warn!(
                        operation,
                        attempt,
                        max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "retryable store failure, retrying",
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
