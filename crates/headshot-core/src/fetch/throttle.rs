//! Per-host request spacing for callers that resolve many names at once.
//!
//! The resolver itself probes strictly one URL at a time; this layer is for
//! batch workflows running several resolutions in parallel so that no single
//! external host sees requests closer together than `min_delay`.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::{FetchError, FetchResponse, Fetcher};

/// Requests are spaced per `(scheme, host, port)`, so different paths on the
/// same origin share one slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostKey {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl HostKey {
    pub fn from_url(url: &str) -> Result<Self> {
        let parsed =
            url::Url::parse(url).with_context(|| format!("invalid URL for host key: {url}"))?;

        let scheme = parsed.scheme().to_string();
        let host = parsed
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("URL missing host: {url}"))?
            .to_ascii_lowercase();
        let port = parsed
            .port_or_known_default()
            .ok_or_else(|| anyhow::anyhow!("URL missing port and unknown default: {url}"))?;

        Ok(Self { scheme, host, port })
    }
}

impl fmt::Display for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// Shared map of the next free request slot per host.
#[derive(Debug)]
pub struct HostThrottle {
    min_delay: Duration,
    next_slot: Mutex<HashMap<HostKey, Instant>>,
}

impl HostThrottle {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            next_slot: Mutex::new(HashMap::new()),
        }
    }

    /// Claim the next slot for `url`'s host and return how long the caller
    /// must wait before using it. Claiming under the lock keeps concurrent
    /// workers from picking the same slot.
    pub fn reserve(&self, url: &str) -> Duration {
        if self.min_delay.is_zero() {
            return Duration::ZERO;
        }
        let Ok(key) = HostKey::from_url(url) else {
            return Duration::ZERO;
        };
        let now = Instant::now();
        let mut slots = self.next_slot.lock().unwrap_or_else(PoisonError::into_inner);
        let start = match slots.get(&key) {
            Some(next) if *next > now => *next,
            _ => now,
        };
        slots.insert(key, start + self.min_delay);
        start - now
    }

    /// Block until `url`'s host may be contacted again.
    pub fn wait(&self, url: &str) {
        let delay = self.reserve(url);
        if !delay.is_zero() {
            tracing::trace!(url, ?delay, "throttling request");
            std::thread::sleep(delay);
        }
    }

    pub fn tracked_hosts(&self) -> usize {
        self.next_slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// `Fetcher` wrapper that waits on a shared `HostThrottle` before each GET.
pub struct ThrottledFetcher<F> {
    inner: F,
    throttle: Arc<HostThrottle>,
}

impl<F: Fetcher> ThrottledFetcher<F> {
    pub fn new(inner: F, throttle: Arc<HostThrottle>) -> Self {
        Self { inner, throttle }
    }
}

impl<F: Fetcher> Fetcher for ThrottledFetcher<F> {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.throttle.wait(url);
        self.inner.get(url)
    }
}
