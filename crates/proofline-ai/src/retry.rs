//! Bounded retry with linear backoff around a [`Generator`] call.

use std::time::Duration;

use tracing::warn;

use crate::generator::{GenerateError, Generator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay after attempt `n` is `base_delay * n`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Interactive single-text review: 3 attempts, 3 s, 6 s.
    pub fn single_text() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(3),
        }
    }

    /// Spreadsheet batches: 5 attempts, 5 s, 10 s, ...
    pub fn batch() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(5),
        }
    }

    /// No waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
        }
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Call `generator` until it succeeds or attempts run out; returns the last error.
    pub async fn generate<G: Generator + ?Sized>(
        &self,
        generator: &G,
        prompt: &str,
    ) -> Result<String, GenerateError> {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match generator.generate(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt >= attempts => {
                    warn!(attempts, error = %e, "all generation attempts failed");
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_after(attempt);
                    warn!(attempt, attempts, error = %e, delay_ms = delay.as_millis() as u64, "generation attempt failed");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::single_text()
    }
}
