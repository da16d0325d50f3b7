//! HTTP access for source adapters, with exponential backoff retry logic.
//!
//! # Architecture
//!
//! - [`GetAsync`]: Core trait for fetching a URL as text
//! - [`ReqwestGet`]: Implementation over a shared `reqwest::Client`
//! - [`RetryGet`]: Decorator that adds retry logic to any `GetAsync` implementation
//!
//! # Retry Strategy
//!
//! - Exponential backoff starting at `base_delay`
//! - Maximum delay capped at 10 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use crate::error::SourceError;
use rand::{Rng, rng};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Retry attempts after the first failure.
pub const DEFAULT_MAX_RETRIES: usize = 2;
/// Delay before the first retry; doubles for each further attempt.
pub const DEFAULT_BASE_DELAY: StdDuration = StdDuration::from_millis(500);

/// Trait for async text retrieval.
pub trait GetAsync {
    async fn get(&self, url: &str) -> Result<String, SourceError>;
}

/// Build the HTTP client shared by every adapter in a run.
pub fn build_client(user_agent: &str, timeout: StdDuration) -> Result<reqwest::Client, SourceError> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Plain GET with status checking.
#[derive(Debug, Clone)]
pub struct ReqwestGet<'a> {
    pub client: &'a reqwest::Client,
}

impl GetAsync for ReqwestGet<'_> {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn get(&self, url: &str) -> Result<String, SourceError> {
        let t0 = Instant::now();
        let res = self.client.get(url).send().await?.error_for_status()?;
        let body = res.text().await?;
        debug!(elapsed_ms = t0.elapsed().as_millis() as u64, bytes = body.len(), "GET ok");
        Ok(body)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`GetAsync`].
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryGet<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryGet<T>
where
    T: GetAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(10),
        }
    }
}

impl<T> fmt::Debug for RetryGet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryGet")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> GetAsync for RetryGet<T>
where
    T: GetAsync,
{
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn get(&self, url: &str) -> Result<String, SourceError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.get(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                            error = %e,
                            "GET exhausted retries"
                        );
                        return Err(e);
                    }

                    let delay = backoff_delay(self.base_delay, self.max_delay, attempt)
                        + StdDuration::from_millis(rng().random_range(0..=250));
                    warn!(
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "GET attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Backoff before retry number `attempt` (1-based), without jitter.
fn backoff_delay(base: StdDuration, max: StdDuration, attempt: usize) -> StdDuration {
    let shift = (attempt.saturating_sub(1)).min(16) as u32;
    base.saturating_mul(1 << shift).min(max)
}

/// GET `url` with retries and return the body.
pub async fn get_text_with_backoff(
    client: &reqwest::Client,
    url: &str,
) -> Result<String, SourceError> {
    let api = RetryGet::new(ReqwestGet { client }, DEFAULT_MAX_RETRIES, DEFAULT_BASE_DELAY);
    api.get(url).await
}

/// GET `url` with retries and decode the JSON body.
pub async fn get_json_with_backoff<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, SourceError> {
    let body = get_text_with_backoff(client, url).await?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Flaky {
        failures: usize,
        calls: AtomicUsize,
    }

    impl GetAsync for Flaky {
        async fn get(&self, _url: &str) -> Result<String, SourceError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(SourceError::Empty(format!("failure {n}")))
            } else {
                Ok("ok".to_string())
            }
        }
    }

    #[test]
    fn test_backoff_delay_doubles_and_caps() {
        let base = StdDuration::from_millis(500);
        let max = StdDuration::from_secs(10);
        assert_eq!(backoff_delay(base, max, 1), StdDuration::from_millis(500));
        assert_eq!(backoff_delay(base, max, 2), StdDuration::from_secs(1));
        assert_eq!(backoff_delay(base, max, 3), StdDuration::from_secs(2));
        assert_eq!(backoff_delay(base, max, 10), max);
    }

    #[tokio::test]
    async fn test_retry_recovers_after_failures() {
        let api = RetryGet::new(
            Flaky { failures: 2, calls: AtomicUsize::new(0) },
            2,
            StdDuration::from_millis(10),
        );
        assert_eq!(api.get("https://example.com").await.unwrap(), "ok");
        assert_eq!(api.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up() {
        let api = RetryGet::new(
            Flaky { failures: 10, calls: AtomicUsize::new(0) },
            1,
            StdDuration::from_millis(10),
        );
        assert!(api.get("https://example.com").await.is_err());
        assert_eq!(api.inner.calls.load(Ordering::SeqCst), 2);
    }
}
