//! Request and response types for the Pxshot client.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::rate_limit::RateLimitInfo;

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG (the service default).
    Png,
    /// JPEG.
    Jpeg,
    /// WebP.
    Webp,
}

/// Page load condition to wait for before capturing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitUntil {
    /// The `load` event.
    Load,
    /// The `DOMContentLoaded` event.
    #[serde(rename = "domcontentloaded")]
    DomContentLoaded,
    /// No network activity for a short period.
    #[serde(rename = "networkidle")]
    NetworkIdle,
}

/// Screenshot request parameters.
///
/// Only the fields below are ever sent; unknown keys in a deserialized
/// request are dropped. Unset options are omitted from the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotRequest {
    /// The page to capture (required).
    #[serde(default)]
    pub url: String,
    /// Image format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,
    /// JPEG/WebP quality (1-100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    /// Viewport width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Viewport height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Capture the full scrollable page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_page: Option<bool>,
    /// Load condition to wait for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_until: Option<WaitUntil>,
    /// CSS selector to wait for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_selector: Option<String>,
    /// Extra wait time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_timeout: Option<u64>,
    /// Device scale factor (1-3). NaN and infinities are not sent.
    #[serde(default, skip_serializing_if = "unset_or_non_finite")]
    pub device_scale_factor: Option<f64>,
    /// Store the image and return a hosted URL instead of bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<bool>,
    /// Block ads and trackers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_ads: Option<bool>,
}

impl ScreenshotRequest {
    /// Create a request for the given URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the image format.
    #[must_use]
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the JPEG/WebP quality.
    #[must_use]
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Set the viewport size.
    #[must_use]
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Capture the full scrollable page.
    #[must_use]
    pub fn with_full_page(mut self, full_page: bool) -> Self {
        self.full_page = Some(full_page);
        self
    }

    /// Set the load condition to wait for.
    #[must_use]
    pub fn with_wait_until(mut self, wait_until: WaitUntil) -> Self {
        self.wait_until = Some(wait_until);
        self
    }

    /// Wait for a CSS selector to appear.
    #[must_use]
    pub fn with_wait_for_selector(mut self, selector: impl Into<String>) -> Self {
        self.wait_for_selector = Some(selector.into());
        self
    }

    /// Wait an extra number of milliseconds before capturing.
    #[must_use]
    pub fn with_wait_for_timeout(mut self, millis: u64) -> Self {
        self.wait_for_timeout = Some(millis);
        self
    }

    /// Set the device scale factor.
    #[must_use]
    pub fn with_device_scale_factor(mut self, factor: f64) -> Self {
        self.device_scale_factor = Some(factor);
        self
    }

    /// Store the image on the service and return a hosted URL.
    #[must_use]
    pub fn with_store(mut self, store: bool) -> Self {
        self.store = Some(store);
        self
    }

    /// Block ads and trackers.
    #[must_use]
    pub fn with_block_ads(mut self, block_ads: bool) -> Self {
        self.block_ads = Some(block_ads);
        self
    }

    /// Whether the response will be a stored-asset descriptor.
    #[must_use]
    pub fn is_stored(&self) -> bool {
        self.store.unwrap_or(false)
    }
}

fn unset_or_non_finite(value: &Option<f64>) -> bool {
    !value.is_some_and(f64::is_finite)
}

/// Result of a screenshot call.
///
/// The variant is chosen by the request's `store` flag, never by
/// inspecting the response.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenshotOutput {
    /// Raw image bytes (`store` unset or false).
    Image(Vec<u8>),
    /// Hosted asset descriptor (`store` true).
    Stored(ScreenshotResult),
}

impl ScreenshotOutput {
    /// The image bytes, if the screenshot was returned inline.
    #[must_use]
    pub fn as_image(&self) -> Option<&[u8]> {
        match self {
            Self::Image(bytes) => Some(bytes),
            Self::Stored(_) => None,
        }
    }

    /// The stored asset descriptor, if the screenshot was stored.
    #[must_use]
    pub fn as_stored(&self) -> Option<&ScreenshotResult> {
        match self {
            Self::Image(_) => None,
            Self::Stored(result) => Some(result),
        }
    }

    /// Whether this is a stored asset descriptor.
    #[must_use]
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored(_))
    }
}

/// Descriptor of a stored screenshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScreenshotResult {
    /// Hosted URL of the image.
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    /// ISO-8601 expiration timestamp of the hosted URL.
    #[serde(default, deserialize_with = "lenient_string")]
    pub expires_at: String,
    /// Image width in pixels.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub width: u64,
    /// Image height in pixels.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub height: u64,
    /// Image size in bytes.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub size_bytes: u64,
    /// Rate limit info from the response.
    #[serde(skip)]
    pub rate_limit: RateLimitInfo,
}

impl ScreenshotResult {
    /// The expiration timestamp, parsed as RFC 3339.
    ///
    /// # Errors
    ///
    /// Returns an error if `expires_at` is not a valid RFC 3339 timestamp.
    pub fn expires_at_datetime(&self) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.expires_at)
    }

    /// Whether the hosted URL has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whether the hosted URL has expired as of `now`.
    ///
    /// An unparseable expiration counts as expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at_datetime()
            .map_or(true, |expires_at| expires_at < now)
    }
}

/// Usage statistics for the account.
///
/// The service may add counters at any time, so the raw map is kept and
/// the well-known ones get typed accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageResult {
    data: Map<String, Value>,
    rate_limit: RateLimitInfo,
}

impl UsageResult {
    /// Create from a decoded usage body.
    #[must_use]
    pub fn new(data: Map<String, Value>, rate_limit: RateLimitInfo) -> Self {
        Self { data, rate_limit }
    }

    /// All usage counters as returned by the service.
    #[must_use]
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// A single usage value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Number of screenshots taken.
    #[must_use]
    pub fn screenshots_count(&self) -> Option<u64> {
        self.first_u64(&["screenshots_count", "screenshots"])
    }

    /// Total bytes of storage used.
    #[must_use]
    pub fn bytes_used(&self) -> Option<u64> {
        self.first_u64(&["bytes_used", "storage_bytes"])
    }

    /// Rate limit info from the response.
    #[must_use]
    pub fn rate_limit_info(&self) -> &RateLimitInfo {
        &self.rate_limit
    }

    fn first_u64(&self, keys: &[&str]) -> Option<u64> {
        keys.iter()
            .filter_map(|key| self.data.get(*key))
            .find(|value| !value.is_null())
            .map(|value| value_as_u64(value).unwrap_or(0))
    }
}

/// Coerce a JSON value to an unsigned integer.
///
/// Accepts integers, floats (truncated) and numeric strings.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.trunc() as u64)
            })
        }
        Value::Bool(b) => Some(u64::from(*b)),
        _ => None,
    }
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_u64(&value).unwrap_or(0))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
