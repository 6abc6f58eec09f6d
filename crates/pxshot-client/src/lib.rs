//! Pxshot Client SDK.
//!
//! This crate provides a client library for the Pxshot screenshot API.
//!
//! # Example
//!
//! ```no_run
//! use pxshot_client::{PxshotClient, ScreenshotOutput, ScreenshotRequest};
//!
//! # async fn example() -> Result<(), pxshot_client::PxshotError> {
//! let client = PxshotClient::new("px_your_api_key")?;
//!
//! // Get the screenshot as bytes
//! let output = client
//!     .screenshot(&ScreenshotRequest::new("https://example.com"))
//!     .await?;
//! if let ScreenshotOutput::Image(bytes) = output {
//!     println!("captured {} bytes", bytes.len());
//! }
//!
//! // Get the screenshot as a hosted URL
//! let output = client
//!     .screenshot(&ScreenshotRequest::new("https://example.com").with_store(true))
//!     .await?;
//! if let ScreenshotOutput::Stored(result) = output {
//!     println!("stored at {} until {}", result.url, result.expires_at);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Every failure is a [`PxshotError`]. Rate limited calls carry the
//! server's `Retry-After` value; the client never retries on its own.
//!
//! ```no_run
//! use pxshot_client::{PxshotClient, PxshotError};
//!
//! # async fn example(client: PxshotClient) {
//! match client.usage().await {
//!     Ok(usage) => println!("screenshots: {:?}", usage.screenshots_count()),
//!     Err(PxshotError::RateLimit { rate_limit, .. }) => {
//!         println!("retry in {:?}s", rate_limit.retry_after());
//!     }
//!     Err(e) => eprintln!("error: {e}"),
//! }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod rate_limit;
mod types;

pub use client::{ClientOptions, PxshotClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS, VERSION};
pub use error::{FieldErrors, PxshotError, Result};
pub use rate_limit::RateLimitInfo;
pub use types::*;
