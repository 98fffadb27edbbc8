//! Retry policy for transient upstream failures.

use crate::error::ApiError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Exponential-backoff retry policy.
///
/// One policy value wraps any fallible async operation via [`RetryPolicy::run`].
/// Only [transient](ApiError::is_transient) failures are retried; an upstream
/// error response is returned immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Delay before the second attempt
    pub base_delay: Duration,

    /// Factor applied to the delay after each failed attempt
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    /// Three attempts with delays of 2s then 4s.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Backoff delay after the given 1-based failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.powi(attempt.saturating_sub(1) as i32);
        Duration::from_secs_f64(self.base_delay.as_secs_f64() * factor)
    }

    /// Run `op` until it succeeds, fails non-transiently, or the attempt
    /// budget runs out.
    ///
    /// Exhaustion surfaces as [`ApiError::RetriesExhausted`] carrying the
    /// last transient failure. The backoff sleep blocks only this call path.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "transient upstream failure, backing off"
                    );
                    sleep(delay).await;
                }
                Err(e) if e.is_transient() => {
                    return Err(ApiError::RetriesExhausted {
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}
