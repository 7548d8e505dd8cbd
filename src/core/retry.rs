//! Retry-with-backoff executor for calls to unreliable external APIs.
//!
//! Each call-site class (model calls, chat posts) carries its own
//! [`RetryPolicy`] naming which error kinds are worth retrying; everything
//! else propagates on the first occurrence.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::errors::BotError;

/// Pure retry configuration; `const`-constructible, one per call-site class.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Which error kinds are transient enough to retry.
    pub retry_on: fn(&BotError) -> bool,
    /// Total attempts, including the first one. Must be >= 1.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    /// Applied to the delay after every failed attempt. Must be >= 1.
    pub backoff_multiplier: f64,
}

/// Runs `operation` under `policy`.
///
/// Retryable failures are logged with the upcoming delay and retried after a
/// cooperative sleep, the delay growing by the policy's multiplier. The final
/// attempt's error propagates unchanged; non-retryable errors propagate
/// immediately without any delay.
pub async fn execute<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, BotError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BotError>>,
{
    let mut delay = policy.initial_delay;
    let mut attempt: u32 = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_attempts && (policy.retry_on)(&e) => {
                warn!(
                    "attempt {}/{} failed: {}, retrying in {:?}",
                    attempt, policy.max_attempts, e, delay
                );
                tokio::time::sleep(delay).await;
                delay = delay.mul_f64(policy.backoff_multiplier);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
