//! Rate limiting implementation
//!
//! Trello answers 429 once a token sends more than 100 requests in a
//! 10 second window. The client throttles itself below that with a
//! governor token bucket so paging through large boards never trips it.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Requests Trello accepts per token within one window
pub const TRELLO_TOKEN_REQUESTS: u32 = 100;

/// Length of Trello's rate-limit window in seconds
pub const TRELLO_WINDOW_SECS: u32 = 10;

/// Client-side request budget, as a sustained rate plus a burst allowance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Sustained requests per second
    pub requests_per_second: u32,
    /// Requests that may go out back to back before the rate applies
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::trello()
    }
}

impl RateLimiterConfig {
    /// Explicit rate and burst
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }

    /// Spread `requests` evenly over a window of `window_secs`.
    ///
    /// The burst equals one second's worth of requests so a full window never
    /// sends more than `requests`.
    pub fn per_window(requests: u32, window_secs: u32) -> Self {
        let rate = (requests / window_secs.max(1)).max(1);
        Self::new(rate, rate)
    }

    /// Trello's per-token quota: 100 requests every 10 seconds
    pub fn trello() -> Self {
        Self::per_window(TRELLO_TOKEN_REQUESTS, TRELLO_WINDOW_SECS)
    }
}

type DirectLimiter = Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Shared token bucket; clones draw from the same budget
#[derive(Clone)]
pub struct RateLimiter {
    bucket: Arc<DirectLimiter>,
    config: RateLimiterConfig,
}

impl RateLimiter {
    /// Build a bucket from `config`; zero values count as one
    pub fn new(config: &RateLimiterConfig) -> Self {
        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);

        Self {
            bucket: Arc::new(Governor::direct(
                Quota::per_second(per_second).allow_burst(burst),
            )),
            config: config.clone(),
        }
    }

    /// Budget this bucket was built from
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Sleep until the next request fits in the budget
    pub async fn wait(&self) {
        self.bucket.until_ready().await;
    }

    /// Take a slot if one is free right now
    pub fn try_acquire(&self) -> bool {
        self.bucket.check().is_ok()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(&RateLimiterConfig::trello())
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
