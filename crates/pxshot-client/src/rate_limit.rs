//! Rate limit metadata carried on API responses.

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;

/// Header holding the request quota for the current window.
const LIMIT_HEADER: &str = "x-ratelimit-limit";
/// Header holding the requests left in the current window.
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
/// Header holding the window reset time (Unix seconds).
const RESET_HEADER: &str = "x-ratelimit-reset";
/// Header holding the number of seconds to wait before retrying.
const RETRY_AFTER_HEADER: &str = "retry-after";

/// Rate limit information extracted from response headers.
///
/// Every field is optional: the service only sends the headers it has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    limit: Option<u64>,
    remaining: Option<u64>,
    reset: Option<u64>,
    retry_after: Option<u64>,
}

impl RateLimitInfo {
    /// Create rate limit info from explicit values.
    #[must_use]
    pub fn new(
        limit: Option<u64>,
        remaining: Option<u64>,
        reset: Option<u64>,
        retry_after: Option<u64>,
    ) -> Self {
        Self {
            limit,
            remaining,
            reset,
            retry_after,
        }
    }

    /// Parse rate limit info from response headers.
    ///
    /// Header names match case-insensitively and the first value of a
    /// repeated header wins. Values that are not non-negative integers are
    /// treated as absent.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: header_u64(headers, LIMIT_HEADER),
            remaining: header_u64(headers, REMAINING_HEADER),
            reset: header_u64(headers, RESET_HEADER),
            retry_after: header_u64(headers, RETRY_AFTER_HEADER),
        }
    }

    /// Maximum number of requests allowed in the current window.
    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Number of requests remaining in the current window.
    #[must_use]
    pub fn remaining(&self) -> Option<u64> {
        self.remaining
    }

    /// Unix timestamp at which the window resets.
    #[must_use]
    pub fn reset(&self) -> Option<u64> {
        self.reset
    }

    /// The reset timestamp as a UTC datetime.
    #[must_use]
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.reset?).ok()?;
        DateTime::from_timestamp(secs, 0)
    }

    /// Seconds to wait before retrying (sent with 429 responses).
    #[must_use]
    pub fn retry_after(&self) -> Option<u64> {
        self.retry_after
    }

    /// Whether the response carried quota information at all.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.limit.is_some() || self.remaining.is_some()
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
