//! Retry policy shared by the registry transport and the completion client.
//!
//! Both clients make a bounded number of attempts and sleep between them;
//! they differ only in the delay function. The transport waits a fixed
//! second, the completion client doubles its wait after every failure.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

/// How long to wait after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// The same delay after every failure.
    Fixed(Duration),
    /// `base * 2^(n-1)` after the n-th failure: 1s, 2s, 4s, ... for a 1s base.
    Exponential { base: Duration },
}

/// A bounded retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed(delay),
        }
    }

    pub fn exponential(max_attempts: u32, base: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Exponential { base },
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base } => {
                let exponent = attempt.saturating_sub(1).min(31);
                base.saturating_mul(1u32 << exponent)
            }
        }
    }

    /// Run `operation` until it succeeds or the attempts are used up.
    ///
    /// `operation` receives the 1-based attempt number. Each failure is
    /// logged; the last error is returned once the policy is exhausted.
    /// No delay follows the final attempt.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= max_attempts => {
                    error!(operation = label, attempts = max_attempts, error = %e, "Retries exhausted");
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_after(attempt);
                    warn!(
                        operation = label,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
