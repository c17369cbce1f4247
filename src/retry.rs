//! Retry with exponential backoff for the backend API and translation
//! bundle fetches.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Backoff policy for one class of requests.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each retry after that.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl RetryConfig {
    /// Preset for auth/posts API calls: 3 attempts, 500ms then 1s waits.
    pub fn api_call() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(2),
        }
    }

    /// Preset for translation bundle fetches: 2 attempts, one quick retry.
    /// Bundles degrade gracefully, so aggressive retrying buys little.
    pub fn bundle_fetch() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_millis(250),
        }
    }

    fn delay_before_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32 << (attempt - 1).min(16);
        (self.initial_delay * factor).min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::api_call()
    }
}

/// Run `operation` until it succeeds, the error is not worth retrying, or
/// attempts run out. `should_retry` sees each error; returning `false`
/// fails fast.
pub async fn with_retry_if<T, E, F, Fut, P>(
    config: &RetryConfig,
    operation_name: &str,
    should_retry: P,
    mut operation: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    assert!(config.max_attempts >= 1, "max_attempts must be at least 1");

    let mut attempt = 0;
    loop {
        let delay = config.delay_before_attempt(attempt);
        if !delay.is_zero() {
            debug!("{operation_name}: retry {attempt} after {delay:?}");
            sleep(delay).await;
        }

        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let last_attempt = attempt + 1 >= config.max_attempts;
                if last_attempt || !should_retry(&err) {
                    return Err(err);
                }
                warn!("{operation_name} failed (attempt {}): {err}", attempt + 1);
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn instant_config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> =
            with_retry_if(&instant_config(3), "op", |_| true, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(7) }
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, String> =
            with_retry_if(&instant_config(3), "op", |_| true, || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err("transient".to_string())
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> =
            with_retry_if(&instant_config(3), "op", |_| true, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("always".to_string()) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_fast() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = with_retry_if(
            &instant_config(5),
            "op",
            |err: &String| err == "transient",
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("fatal".to_string()) }
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delay_growth_is_capped() {
        let config = RetryConfig {
            max_attempts: 6,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
        };
        assert_eq!(config.delay_before_attempt(0), Duration::ZERO);
        assert_eq!(config.delay_before_attempt(1), Duration::from_millis(100));
        assert_eq!(config.delay_before_attempt(2), Duration::from_millis(200));
        assert_eq!(config.delay_before_attempt(3), Duration::from_millis(350));
        assert_eq!(config.delay_before_attempt(5), Duration::from_millis(350));
    }
}
