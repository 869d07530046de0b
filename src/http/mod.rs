//! HTTP client module
//!
//! Sends single authenticated GET requests and turns their bodies into
//! pages.
//!
//! # Features
//!
//! - **Request Executor**: `HttpClient::fetch_page` issues exactly one GET,
//!   validates status and content type, and flattens the JSON body
//! - **Rate Limiting**: optional token bucket rate limiter using governor
//! - **Caller-level Retry**: `RetryPolicy` wraps whole calls with a bounded,
//!   fixed-delay retry; the client itself never retries

mod client;
mod rate_limit;
mod retry;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use retry::RetryPolicy;

#[cfg(test)]
mod tests;
