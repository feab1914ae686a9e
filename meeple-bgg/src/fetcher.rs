use tokio::time::Duration;

use crate::error::EnrichError;
use crate::http::{FetchResponse, HttpFetch};

/// Status BoardGameGeek answers with while it builds a response in the background.
pub const PROCESSING_STATUS: u16 = 202;

/// How long and how often to wait out a "still processing" answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub processing_status: u16,
    /// Retries after the first attempt; 0 disables retrying.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            processing_status: PROCESSING_STATUS,
            max_retries: 6,
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Policy that retries immediately; used by tests and offline fixtures.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Upper bound of the delay before retry number `retry` (0-based):
    /// the initial delay doubled per retry, capped at `max_delay`.
    pub fn backoff_ceiling(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Delay before retry number `retry`, with equal jitter: half the
    /// ceiling plus a random share of the other half.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let ceiling = self.backoff_ceiling(retry).as_millis() as u64;
        let half = ceiling / 2;
        let jitter = rand::random_range(0..=ceiling - half);
        Duration::from_millis(half + jitter)
    }
}

/// Issues GETs and waits out the provider's "processing" status.
///
/// Transport errors are returned immediately. Every other status, including
/// 4xx/5xx, is handed back to the caller untouched.
pub struct RateLimitedFetcher<F> {
    inner: F,
    policy: RetryPolicy,
}

impl<F: HttpFetch> RateLimitedFetcher<F> {
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchResponse, EnrichError> {
        let mut retries = 0;
        loop {
            let resp = self
                .inner
                .get(url)
                .await
                .map_err(|source| EnrichError::Transport {
                    url: url.to_string(),
                    source,
                })?;

            if resp.status != self.policy.processing_status {
                log::debug!("GET {} -> {} ({} bytes)", url, resp.status, resp.body.len());
                return Ok(resp);
            }

            if retries >= self.policy.max_retries {
                return Err(EnrichError::RateLimited {
                    url: url.to_string(),
                    attempts: retries + 1,
                });
            }

            let delay = self.policy.delay_for(retries);
            log::info!(
                "BoardGameGeek is still processing {}, retrying in {:.1}s",
                url,
                delay.as_secs_f64()
            );
            tokio::time::sleep(delay).await;
            retries += 1;
        }
    }
}
