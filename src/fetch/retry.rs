//! Retry with exponential backoff
//!
//! A request-scoped wrapper: each call owns its attempt counter, nothing is
//! shared between concurrent requests.

use crate::config::FetcherConfig;
use std::future::Future;
use std::time::Duration;

/// Backoff parameters for one retried operation
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Wait before the second attempt, doubled for each one after
    pub base_delay: Duration,
    /// Upper bound on any single wait, jitter included
    pub max_delay: Duration,
    /// Uniform random extra wait in `[0, jitter)`
    pub jitter: Duration,
}

impl RetryPolicy {
    /// Builds the policy described by the fetcher configuration
    pub fn from_config(config: &FetcherConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.backoff_base_ms),
            max_delay: Duration::from_millis(config.backoff_cap_ms),
            jitter: Duration::from_millis(config.backoff_jitter_ms),
        }
    }

    /// A policy that never waits, for tests
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    /// Wait applied after the given failed attempt (1-based)
    ///
    /// `min(base * 2^(attempt - 1) + U[0, jitter), max_delay)`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let backoff = self.base_delay.saturating_mul(1u32 << exponent);
        let jitter = self.jitter.mul_f64(fastrand::f64());
        backoff.saturating_add(jitter).min(self.max_delay)
    }
}

/// Why a retried operation gave up
#[derive(Debug)]
pub struct RetryFailure<E> {
    /// The error from the final attempt
    pub last: E,
    /// Attempts actually made
    pub attempts: u32,
}

/// Runs `operation` until it succeeds, fails permanently, or runs out of attempts
///
/// Errors for which `is_retryable` returns false end the loop immediately.
pub async fn retry_with_backoff<T, E, F, Fut, R>(
    policy: &RetryPolicy,
    mut operation: F,
    is_retryable: R,
) -> Result<T, RetryFailure<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts && is_retryable(&e) => {
                let delay = policy.delay_for(attempt);
                tracing::debug!(
                    "Attempt {}/{} failed ({}), retrying in {:?}",
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(RetryFailure {
                    last: e,
                    attempts: attempt,
                })
            }
        }
    }
}
