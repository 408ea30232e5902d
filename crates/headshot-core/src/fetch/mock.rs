//! Canned-response fetcher for tests and dry runs.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{FetchError, FetchResponse, Fetcher};

enum Canned {
    Response(FetchResponse),
    /// Transport failure carrying a libcurl error code.
    Error(u32),
}

/// Answers from a fixed URL table and records every request in order.
/// URLs without an entry answer `404` with an empty body.
#[derive(Default)]
pub struct MockFetcher {
    responses: HashMap<String, Canned>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url: &str, response: FetchResponse) -> Self {
        self.responses
            .insert(url.to_string(), Canned::Response(response));
        self
    }

    /// 200 with the given content type and body.
    pub fn with_bytes(self, url: &str, content_type: &str, body: Vec<u8>) -> Self {
        self.with_response(
            url,
            FetchResponse {
                status: 200,
                content_type: Some(content_type.to_string()),
                final_url: None,
                body,
            },
        )
    }

    pub fn with_html(self, url: &str, html: &str) -> Self {
        self.with_bytes(url, "text/html; charset=utf-8", html.as_bytes().to_vec())
    }

    pub fn with_json(self, url: &str, json: &str) -> Self {
        self.with_bytes(url, "application/json", json.as_bytes().to_vec())
    }

    pub fn with_status(self, url: &str, status: u32) -> Self {
        self.with_response(
            url,
            FetchResponse {
                status,
                content_type: None,
                final_url: None,
                body: Vec::new(),
            },
        )
    }

    /// Simulate an operation timeout (CURLE_OPERATION_TIMEDOUT).
    pub fn with_timeout(mut self, url: &str) -> Self {
        self.responses.insert(url.to_string(), Canned::Error(28));
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Fetcher for MockFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
        match self.responses.get(url) {
            Some(Canned::Response(r)) => Ok(r.clone()),
            Some(Canned::Error(code)) => Err(FetchError::Curl(curl::Error::new(*code))),
            None => Ok(FetchResponse {
                status: 404,
                content_type: Some("text/html".to_string()),
                final_url: None,
                body: Vec::new(),
            }),
        }
    }
}
