//! Caller-level retry
//!
//! The request executor and pager fail fast. Callers that want to ride out
//! transient server errors wrap a whole call in a [`RetryPolicy`]: a fixed
//! number of attempts separated by a fixed delay.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Bounded, fixed-delay retry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first
    pub max_attempts: u32,
    /// Delay between attempts
    #[serde(with = "millis")]
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    /// Single attempt, no retry
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::from_millis(1500),
        }
    }

    /// Up to `max_attempts` attempts, `delay` apart
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `operation`, retrying errors for which
    /// [`Error::is_retryable`](crate::Error::is_retryable) holds
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts && e.is_retryable() => {
                    warn!(
                        "Attempt {}/{} failed: {e}, retrying in {:?}",
                        attempt, max_attempts, self.delay
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(delay.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod retry_tests {
    use super::*;
    use crate::error::Error;
    use std::cell::Cell;

    #[test]
    fn test_default_is_single_attempt() {
        assert_eq!(RetryPolicy::default().max_attempts, 1);
    }

    #[tokio::test]
    async fn test_retries_retryable_errors() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::fixed(3, Duration::from_millis(1));

        let result = policy
            .run(|| {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 3 {
                        Err(Error::http_status(503, "Service Unavailable", ""))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::fixed(2, Duration::from_millis(1));

        let result: Result<()> = policy
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err(Error::http_status(500, "Internal Server Error", "")) }
            })
            .await;

        assert_eq!(result.unwrap_err().status(), Some(500));
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_does_not_retry_client_errors() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::fixed(5, Duration::from_millis(1));

        let result: Result<()> = policy
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err(Error::http_status(401, "Unauthorized", "invalid token")) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_deserialize_delay_in_millis() {
        let policy: RetryPolicy =
            serde_yaml::from_str("max_attempts: 3\ndelay: 250\n").unwrap();
        assert_eq!(policy, RetryPolicy::fixed(3, Duration::from_millis(250)));
    }
}
