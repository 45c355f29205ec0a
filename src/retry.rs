use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Exponential backoff settings for calls to the translation provider.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first one)
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Factor applied to the delay after every failed retry
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Preset for machine translation requests (3 attempts).
    /// Delays: 1s, 2s = 3s total wait time
    pub fn translation_api() -> Self {
        Self::new(3, Duration::from_secs(1)).with_max_delay(Duration::from_secs(5))
    }

    /// Delay before attempt `attempt` (0-indexed; the first attempt never waits).
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi((attempt - 1) as i32);

        Duration::from_millis(delay_ms as u64).min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::translation_api()
    }
}

/// Run `operation` until it succeeds, `should_retry` rejects its error, or the
/// attempts run out. Returns the last error in the latter two cases.
///
/// A `max_attempts` of 0 is treated as 1.
pub async fn with_retry_if<T, E, F, Fut, P>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        let delay = config.delay_for_attempt(attempt);
        if !delay.is_zero() {
            debug!(
                "{}: Retry attempt {}/{} after {:?}",
                operation_name,
                attempt + 1,
                max_attempts,
                delay
            );
            sleep(delay).await;
        }

        let error = match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!("{}: Succeeded on attempt {}", operation_name, attempt + 1);
                }
                return Ok(result);
            }
            Err(e) => e,
        };

        if !should_retry(&error) {
            debug!("{}: Error is not retryable: {}", operation_name, error);
            return Err(error);
        }

        attempt += 1;
        if attempt >= max_attempts {
            warn!(
                "{}: All {} attempts failed. Last error: {}",
                operation_name, max_attempts, error
            );
            return Err(error);
        }
        warn!(
            "{}: Attempt {}/{} failed ({}), {} retries remaining",
            operation_name,
            attempt,
            max_attempts,
            error,
            max_attempts - attempt
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast() -> RetryConfig {
        RetryConfig::new(3, Duration::from_millis(5))
    }

    #[test]
    fn test_translation_api_preset() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.initial_delay, Duration::from_secs(1));
        assert_eq!(config.max_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_delay_calculation() {
        let config = RetryConfig::new(4, Duration::from_secs(1)).with_backoff_multiplier(2.0);

        assert_eq!(config.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(4));
    }

    #[test]
    fn test_delay_respects_max() {
        let config = RetryConfig::new(10, Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(3));

        // Attempt 4 would be 8 seconds, but max is 3
        assert_eq!(config.delay_for_attempt(4), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<u32, String> = with_retry_if(
            &fast(),
            "test",
            || {
                let c = counter_clone.clone();
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err("transient".to_string())
                    } else {
                        Ok(7)
                    }
                }
            },
            |_| true,
        )
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<u32, String> = with_retry_if(
            &fast(),
            "test",
            || {
                let c = counter_clone.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err("down".to_string())
                }
            },
            |_| true,
        )
        .await;

        assert_eq!(result.unwrap_err(), "down");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_immediately() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<u32, String> = with_retry_if(
            &fast(),
            "test",
            || {
                let c = counter_clone.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err("400".to_string())
                }
            },
            |e| e != "400",
        )
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let config = RetryConfig::new(0, Duration::from_millis(1));
        let result: Result<u32, String> =
            with_retry_if(&config, "test", || async { Ok(1) }, |_| true).await;
        assert_eq!(result.unwrap(), 1);
    }
}
