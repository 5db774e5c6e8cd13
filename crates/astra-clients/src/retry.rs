//! Retry with exponential backoff for upstream HTTP calls.
//!
//! Transport errors (connection failures, timeouts) and throttling or
//! server responses (429, 5xx) are retried. Other statuses are returned to
//! the caller on the first attempt.

use std::time::Duration;

/// How many times to try a request and how long to wait in between.
///
/// The delay before retry `n` (1-based) is `base_delay * 2^(n-1)`, capped
/// at `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    /// Three attempts, waiting 4s then 8s.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Three attempts, waiting 200ms then 400ms.
    pub fn quick() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_millis(800),
        }
    }

    /// A single attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before the retry following attempt `attempt` (0-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Send an HTTP request, retrying per `policy`.
///
/// The closure `f` is called up to `policy.max_attempts` times. The last
/// attempt's outcome is returned as-is, including a retryable status; the
/// caller is responsible for inspecting the response status code.
pub(crate) async fn retry_send<F, Fut>(
    policy: &RetryPolicy,
    endpoint: &str,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let attempts = policy.max_attempts.max(1);
    for attempt in 0..attempts - 1 {
        let delay = policy.delay_after(attempt);
        match f().await {
            Ok(resp) if !is_retryable_status(resp.status()) => return Ok(resp),
            Ok(resp) => {
                tracing::warn!(
                    endpoint,
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    status = resp.status().as_u16(),
                    "upstream returned retryable status, retrying in {delay:?}"
                );
            }
            Err(e) => {
                // Query strings may carry API keys.
                let e = e.without_url();
                tracing::warn!(
                    endpoint,
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    "upstream request failed, retrying in {delay:?}: {e}"
                );
            }
        }
        tokio::time::sleep(delay).await;
    }
    f().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    #[test]
    fn default_delays_double_and_cap() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(0), Duration::from_secs(4));
        assert_eq!(policy.delay_after(1), Duration::from_secs(8));
        assert_eq!(policy.delay_after(2), Duration::from_secs(10));
        assert_eq!(policy.delay_after(40), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn retry_exhausts_all_attempts_on_transport_failure() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = call_count.clone();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        let result = retry_send(&fast(3), "GET /", || {
            let cc = cc.clone();
            let http = http.clone();
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                // Closed port: connection refused.
                http.get("http://127.0.0.1:1/").send().await
            }
        })
        .await;

        assert!(result.is_err(), "request to closed port must fail");
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_attempts_still_sends_once() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = call_count.clone();
        let http = reqwest::Client::new();

        let _ = retry_send(&fast(0), "GET /", || {
            let cc = cc.clone();
            let http = http.clone();
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                http.get("http://127.0.0.1:1/").send().await
            }
        })
        .await;

        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }
}
