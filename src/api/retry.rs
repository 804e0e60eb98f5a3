use anyhow::Result;
use std::time::Duration;
use tokio::time::sleep;

/// Retry configuration with exponential backoff, used for read-only requests
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            backoff_factor: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.max(1),
            ..Default::default()
        }
    }

    /// Execute a function with retries and exponential backoff. Errors for
    /// which `retryable` returns `false` are returned immediately.
    pub async fn execute<F, Fut, T>(&self, mut func: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        let mut delay_ms = self.initial_delay_ms;

        loop {
            match func().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;

                    if !retryable(&e) {
                        return Err(e);
                    }

                    if attempt >= self.max_retries {
                        if self.max_retries > 1 {
                            tracing::warn!("Max retries ({}) exceeded", self.max_retries);
                        }
                        return Err(e);
                    }

                    tracing::debug!(
                        "Attempt {} failed, retrying in {}ms: {}",
                        attempt,
                        delay_ms,
                        e
                    );

                    sleep(Duration::from_millis(delay_ms)).await;

                    // Exponential backoff with cap
                    delay_ms = ((delay_ms as f64 * self.backoff_factor) as u64)
                        .min(self.max_delay_ms);
                }
            }
        }
    }
}

fn retryable(error: &anyhow::Error) -> bool {
    match error.downcast_ref::<super::ApiError>() {
        Some(api_error) => api_error.is_transient(),
        None => true,
    }
}
