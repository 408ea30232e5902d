//! libcurl-backed GET.
//!
//! One `Easy` handle per request, so concurrent callers never share a
//! session. Bodies are buffered in memory up to `max_body_bytes`.

use std::time::Duration;

use super::{FetchError, FetchResponse, Fetcher};
use crate::config::ResolverConfig;

const ACCEPT: &str = "Accept: image/webp,image/apng,image/*,*/*;q=0.8";
const MAX_REDIRECTS: u32 = 5;

/// Per-request settings for `CurlFetcher`.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub user_agent: String,
    pub connect_timeout: Duration,
    /// Upper bound for the whole exchange, including body transfer.
    pub request_timeout: Duration,
    pub max_body_bytes: usize,
}

impl FetchOptions {
    pub fn from_config(cfg: &ResolverConfig) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            connect_timeout: Duration::from_secs(cfg.connect_timeout),
            request_timeout: Duration::from_secs(cfg.request_timeout),
            max_body_bytes: cfg.max_body_bytes,
        }
    }
}

/// Blocking fetcher; call from `spawn_blocking` when used from async code.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    opts: FetchOptions,
}

impl CurlFetcher {
    pub fn new(opts: FetchOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.opts
    }
}

impl Fetcher for CurlFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)
            .map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTS)?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        easy.timeout(self.opts.request_timeout)?;
        easy.useragent(&self.opts.user_agent)?;

        let mut list = curl::easy::List::new();
        list.append(ACCEPT)?;
        easy.http_headers(list)?;

        let limit = self.opts.max_body_bytes;
        let mut body: Vec<u8> = Vec::new();
        let mut too_large = false;
        let outcome = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                if body.len() + data.len() > limit {
                    too_large = true;
                    // Returning a short count aborts the transfer.
                    return Ok(0);
                }
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()
        };
        if too_large {
            return Err(FetchError::BodyTooLarge { limit });
        }
        outcome?;

        let status = easy.response_code()?;
        let content_type = easy.content_type()?.map(str::to_string);
        let final_url = easy
            .effective_url()?
            .filter(|u| *u != url)
            .map(str::to_string);

        Ok(FetchResponse {
            status,
            content_type,
            final_url,
            body,
        })
    }
}
