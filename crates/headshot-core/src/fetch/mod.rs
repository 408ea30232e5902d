//! HTTP fetch seam.
//!
//! Every outbound request (image probes and intermediate lookups) goes
//! through the `Fetcher` trait so the resolver can run against libcurl in
//! production and canned responses in tests.

mod client;
mod mock;
mod throttle;

pub use client::{CurlFetcher, FetchOptions};
pub use mock::MockFetcher;
pub use throttle::{HostKey, HostThrottle, ThrottledFetcher};

use std::sync::Arc;
use thiserror::Error;

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u32,
    /// `Content-Type` as sent by the server, if any.
    pub content_type: Option<String>,
    /// URL after redirects, if it differs from the requested one.
    pub final_url: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text (lossy), for JSON/HTML lookups.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport-level failure: no usable HTTP exchange happened.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("response body exceeded {limit} bytes")]
    BodyTooLarge { limit: usize },
}

/// Performs a blocking GET. Implementations must be shareable across
/// worker threads.
pub trait Fetcher: Send + Sync {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        (**self).get(url)
    }
}
