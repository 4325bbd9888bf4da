use crate::error::ApiError;
use backoff::{ExponentialBackoff, backoff::Backoff};
use std::future::Future;
use std::time::Duration;

/// Retry configuration for API operations
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, the first one included
    pub max_retries: u32,
    /// Initial retry delay
    pub initial_delay: Duration,
    /// Maximum retry delay
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
    /// Whether to retry on client errors (4xx other than 429)
    pub retry_client_errors: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            retry_client_errors: false,
        }
    }
}

impl RetryConfig {
    /// Create a config for aggressive retry (longer delays, more attempts)
    pub fn aggressive() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(120),
            multiplier: 2.5,
            retry_client_errors: false,
        }
    }

    /// Create a config for quick retry (shorter delays, fewer attempts)
    pub fn quick() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(10),
            multiplier: 1.5,
            retry_client_errors: false,
        }
    }

    /// Single attempt, no retry
    pub fn none() -> Self {
        Self {
            max_retries: 1,
            ..Self::quick()
        }
    }

    /// Default policy with a custom attempt count
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.max(1),
            ..Self::default()
        }
    }
}

/// Retry executor with configurable policies
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    /// Create a new retry executor with the given config
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute an async operation with retry logic
    pub async fn execute<F, Fut, T>(&self, operation: F) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut backoff = ExponentialBackoff {
            initial_interval: self.config.initial_delay,
            max_interval: self.config.max_delay,
            multiplier: self.config.multiplier,
            max_elapsed_time: None,
            ..Default::default()
        };
        backoff.reset();

        let mut attempt = 0;

        loop {
            attempt += 1;

            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    if !self.should_retry(&error, attempt) {
                        if attempt > 1 {
                            log::warn!(
                                "Giving up after {} attempts: {}",
                                attempt,
                                error
                            );
                        }
                        return Err(error);
                    }

                    match backoff.next_backoff() {
                        Some(delay) => {
                            log::debug!(
                                "Retrying operation after {:?} (attempt {}): {}",
                                delay,
                                attempt,
                                error
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => return Err(error),
                    }
                }
            }
        }
    }

    /// Determine if an error should trigger a retry
    fn should_retry(&self, error: &ApiError, attempt: u32) -> bool {
        if attempt >= self.config.max_retries {
            return false;
        }

        match error {
            // Server errors, throttling and timeouts are transient
            ApiError::Http {
                status: 500..=599 | 429,
                ..
            } => true,
            ApiError::Timeout { .. } => true,
            ApiError::Transport { .. } => true,

            ApiError::Http {
                status: 400..=499, ..
            } => self.config.retry_client_errors,

            ApiError::Unauthorized { .. } => false,
            ApiError::Auth(_) => false,
            ApiError::Payload { .. } => false,
            ApiError::InvalidRequest { .. } => false,
            ApiError::Http { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn server_error() -> ApiError {
        ApiError::Http {
            status: 503,
            endpoint: "/test".to_string(),
            message: "Service Unavailable".to_string(),
        }
    }

    #[tokio::test]
    async fn test_retry_success_immediate() {
        let executor = RetryExecutor::new(RetryConfig::default());

        let result = executor.execute(|| async { Ok::<i32, ApiError>(42) }).await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_retry_recovers_from_server_error() {
        let executor = RetryExecutor::new(RetryConfig::quick());
        let calls = Arc::new(AtomicU32::new(0));

        let result = executor
            .execute(|| {
                let calls = Arc::clone(&calls);
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(server_error())
                    } else {
                        Ok("recovered")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_stops_at_max_attempts() {
        let executor = RetryExecutor::new(RetryConfig::quick());
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), ApiError> = executor
            .execute(|| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(server_error())
                }
            })
            .await;

        assert!(matches!(result, Err(ApiError::Http { status: 503, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_gives_up_on_auth_error() {
        let executor = RetryExecutor::new(RetryConfig::default());
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<String, ApiError> = executor
            .execute(|| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(ApiError::Unauthorized {
                        status: 401,
                        endpoint: "/test".to_string(),
                        server_message: "Unauthorized".to_string(),
                    })
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_retry_preset_runs_once() {
        let executor = RetryExecutor::new(RetryConfig::none());
        let calls = Arc::new(AtomicU32::new(0));

        let _: Result<(), ApiError> = executor
            .execute(|| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(server_error())
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_retry_config_presets() {
        let default = RetryConfig::default();
        assert_eq!(default.max_retries, 3);
        assert_eq!(default.initial_delay, Duration::from_millis(100));

        let aggressive = RetryConfig::aggressive();
        assert_eq!(aggressive.max_retries, 5);
        assert_eq!(aggressive.initial_delay, Duration::from_millis(200));

        let quick = RetryConfig::quick();
        assert_eq!(quick.max_retries, 2);
        assert_eq!(quick.initial_delay, Duration::from_millis(50));

        assert_eq!(RetryConfig::with_max_retries(0).max_retries, 1);
    }
}
