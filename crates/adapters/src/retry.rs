// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exponential-backoff retry over a supplied operation

use std::future::Future;
use std::time::Duration;

/// Backoff parameters. Stateless; one policy value can drive any number of
/// concurrent retries.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            factor: 2.0,
        }
    }
}

/// Drive `op` until it succeeds, a non-retryable failure occurs, or
/// `policy.attempts` attempts are exhausted; the last failure is returned.
///
/// Between attempts the driver sleeps the current delay, then multiplies it
/// by `factor` clamped to `max_delay`.
pub async fn retry<T, E, F, Fut, P>(policy: RetryPolicy, is_retryable: P, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut delay = policy.initial_delay;
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= policy.attempts.max(1) || !is_retryable(&err) {
                    return Err(err);
                }
                tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, error = %err,
                    "transient failure, backing off");
                tokio::time::sleep(delay).await;
                delay = Duration::from_secs_f64(
                    (delay.as_secs_f64() * policy.factor).min(policy.max_delay.as_secs_f64()),
                );
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
