//! Retry policy for calls above the API client

use std::future::Future;

use rand::Rng;

use super::config::RetryConfig;
use crate::api::error::{ApiError, Result};

/// Classification of errors worth retrying
pub trait RetryableError {
    fn is_retryable(&self) -> bool;
}

impl RetryableError for ApiError {
    /// Connection failures, timeouts, throttling, and server errors
    fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport { status: None, .. } => true,
            ApiError::Transport {
                status: Some(status),
                ..
            } => *status == 408 || *status == 429 || (500..600).contains(status),
            ApiError::InvalidArgument(_)
            | ApiError::UnsupportedValueType { .. }
            | ApiError::MalformedDate { .. }
            | ApiError::Protocol(_) => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or runs out of attempts
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < max_attempts && err.is_retryable() => {
                    let delay = self.delay(attempt);
                    log::warn!(
                        "Attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt,
                        max_attempts,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn delay(&self, retry: u32) -> std::time::Duration {
        let delay = self.config.delay_for(retry);
        if !self.config.jitter || delay.is_zero() {
            return delay;
        }
        let factor = rand::rng().random_range(0.5..=1.0);
        delay.mul_f64(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(RetryConfig {
            max_attempts,
            ..RetryConfig::disabled()
        })
    }

    fn transport(status: Option<u16>) -> ApiError {
        ApiError::Transport {
            status,
            message: "test".to_string(),
        }
    }

    #[test]
    fn test_classification() {
        assert!(transport(None).is_retryable());
        assert!(transport(Some(503)).is_retryable());
        assert!(transport(Some(429)).is_retryable());
        assert!(!transport(Some(400)).is_retryable());
        assert!(!transport(Some(404)).is_retryable());
        assert!(!ApiError::protocol("bad").is_retryable());
    }

    #[test]
    fn test_policy_keeps_its_config() {
        assert_eq!(fast(4).config().max_attempts, 4);
        assert_eq!(RetryPolicy::default().config(), &RetryConfig::default());
    }

    #[tokio::test]
    async fn test_retries_server_errors_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = fast(3)
            .execute(|| {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(transport(Some(503)))
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
    async fn test_stops_on_client_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<()> = fast(5)
            .execute(|| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(transport(Some(400)))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<()> = fast(2)
            .execute(|| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(transport(None))
                }
            })
            .await;

        assert!(matches!(result, Err(ApiError::Transport { status: None, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
