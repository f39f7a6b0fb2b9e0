//! Bounded retry with exponential back-off for single API requests.
//!
//! [`RetryPolicy::execute`] retries only [`ErrorKind::Transient`] failures.
//! Client, auth and malformed-payload errors are returned on the attempt that
//! produced them. When every attempt fails transiently the caller receives
//! [`SyncError::RetriesExhausted`] wrapping the last error, and decides for
//! itself whether a partial result is acceptable.

use std::future::Future;
use std::time::Duration;

use crate::error::{ErrorKind, SyncError};

/// Upper bound on a single back-off sleep.
const MAX_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first; never below 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(1), 2.0)
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration, multiplier: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            multiplier,
        }
    }

    /// Policy that never sleeps; used by tests and dry runs against mocks.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO, 1.0)
    }

    /// Sleep applied after failed attempt number `attempt` (1-based):
    /// `base_delay * multiplier^(attempt - 1)`, capped at 60 s.
    ///
    /// | Attempt | base 1 s, multiplier 2 |
    /// |---------|------------------------|
    /// | 1       | 1 s                    |
    /// | 2       | 2 s                    |
    /// | 3       | 4 s                    |
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        if !secs.is_finite() || secs >= MAX_DELAY.as_secs_f64() {
            return MAX_DELAY;
        }
        if secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(secs)
    }

    /// Runs `operation` up to `max_attempts` times.
    ///
    /// No sleep follows the final attempt.
    ///
    /// # Errors
    ///
    /// - The operation's own error, unchanged, when it is not transient.
    /// - [`SyncError::RetriesExhausted`] when the last allowed attempt fails
    ///   transiently.
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> Result<T, SyncError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SyncError>>,
    {
        let mut attempt = 1u32;
        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if err.kind() != ErrorKind::Transient {
                return Err(err);
            }

            if attempt >= self.max_attempts {
                tracing::error!(
                    attempt,
                    max_attempts = self.max_attempts,
                    error = %err,
                    "transient error persisted through all attempts"
                );
                return Err(SyncError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let delay = self.delay_for(attempt);
            #[allow(clippy::cast_possible_truncation)]
            let delay_ms = delay.as_millis() as u64;
            tracing::warn!(
                attempt,
                max_attempts = self.max_attempts,
                delay_ms,
                error = %err,
                "transient error, retrying after back-off"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
