//! Rate Limiting Infrastructure
//!
//! Common rate limiting types and the response header contract shared by
//! every limiter exposed over HTTP.

use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use std::time::Duration;

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Rate limit configuration for a single bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    pub fn window_ms(&self) -> i64 {
        i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX)
    }
}

/// Point-in-time view of a bucket, as reported to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    pub limit: u32,
    pub remaining: u32,
    /// Milliseconds until the window resets
    pub reset_in_ms: u64,
    /// Epoch milliseconds at which the window resets
    pub reset_at_ms: i64,
}

impl RateLimitSnapshot {
    /// Whole seconds until the window resets, rounded up
    pub fn retry_after_secs(&self) -> u64 {
        ceil_secs(self.reset_in_ms)
    }

    /// Write `X-RateLimit-Limit`, `X-RateLimit-Remaining` and `X-RateLimit-Reset`
    pub fn apply_headers(&self, headers: &mut HeaderMap) {
        headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(self.limit));
        headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(self.remaining));
        headers.insert(X_RATELIMIT_RESET, HeaderValue::from(self.reset_at_ms));
    }

    /// Same as [`apply_headers`](Self::apply_headers) plus `Retry-After`
    pub fn apply_rejection_headers(&self, headers: &mut HeaderMap) {
        self.apply_headers(headers);
        headers.insert(header::RETRY_AFTER, HeaderValue::from(self.retry_after_secs()));
    }
}

/// Milliseconds to whole seconds, rounded up
pub fn ceil_secs(ms: u64) -> u64 {
    ms.div_ceil(1000)
}
