//! Ordered, validated headshot lookup.
//!
//! `PhotoResolver` walks its sources in fixed priority order and probes each
//! candidate URL one at a time. The first candidate that passes content
//! validation wins. Every failure along the way (unreachable host, soft-404
//! page, corrupt or tiny image) only disqualifies that candidate; callers see
//! nothing but `Found(url)` or `NotFound`.

use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use crate::config::ResolverConfig;
use crate::fetch::{CurlFetcher, FetchError, FetchOptions, Fetcher};
use crate::hints::Hints;
use crate::name::PlayerName;
use crate::sources::{build_sources, CandidateSource};
use crate::validate::{validate_response, ImageInfo, InvalidContent, Thresholds};

/// Outcome of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(String),
    NotFound,
}

impl Resolution {
    pub fn url(&self) -> Option<&str> {
        match self {
            Resolution::Found(url) => Some(url.as_str()),
            Resolution::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn into_url(self) -> Option<String> {
        match self {
            Resolution::Found(url) => Some(url),
            Resolution::NotFound => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum ProbeError {
    #[error("network: {0}")]
    Network(#[from] FetchError),
    #[error("invalid content: {0}")]
    Invalid(#[from] InvalidContent),
}

/// Stateless between calls; safe to share across worker threads.
pub struct PhotoResolver {
    thresholds: Thresholds,
    sources: Vec<Box<dyn CandidateSource>>,
    fetcher: Arc<dyn Fetcher>,
}

impl PhotoResolver {
    /// Resolver over the configured sources, fetching with libcurl.
    pub fn from_config(cfg: &ResolverConfig) -> Result<Self> {
        let fetcher = CurlFetcher::new(FetchOptions::from_config(cfg));
        Self::new(cfg, Arc::new(fetcher))
    }

    /// Resolver over the configured sources with a caller-supplied fetcher
    /// (throttled, mocked, ...).
    pub fn new(cfg: &ResolverConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        let sources = build_sources(cfg)?;
        let thresholds = Thresholds {
            min_width: cfg.min_width,
            min_height: cfg.min_height,
        };
        Ok(Self::with_sources(thresholds, sources, fetcher))
    }

    pub fn with_sources(
        thresholds: Thresholds,
        sources: Vec<Box<dyn CandidateSource>>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            thresholds,
            sources,
            fetcher,
        }
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Find the first validated headshot URL for `name`.
    pub fn resolve(&self, name: &str, hints: &Hints) -> Resolution {
        self.run(name, hints, None)
    }

    /// Like `resolve`, but gives up (with `NotFound`) once `deadline` has
    /// passed. Checked before every probe; an in-flight probe is still
    /// bounded only by the per-request timeout.
    pub fn resolve_before(&self, name: &str, hints: &Hints, deadline: Instant) -> Resolution {
        self.run(name, hints, Some(deadline))
    }

    /// Whether `url` currently serves a valid headshot.
    pub fn check_url(&self, url: &str) -> bool {
        match self.probe(url) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(url, error = %e, "existing photo failed validation");
                false
            }
        }
    }

    fn run(&self, raw_name: &str, hints: &Hints, deadline: Option<Instant>) -> Resolution {
        let name = match PlayerName::parse(raw_name) {
            Ok(n) => n,
            Err(e) => {
                tracing::debug!(name = raw_name, error = %e, "unusable name, skipping lookup");
                return Resolution::NotFound;
            }
        };
        let expired = || deadline.is_some_and(|d| Instant::now() >= d);

        let mut tried: HashSet<String> = HashSet::new();
        for source in &self.sources {
            if !source.applies_to(hints) {
                tracing::trace!(source = source.name(), "source does not apply to hints");
                continue;
            }
            if expired() {
                tracing::debug!(name = raw_name, "deadline passed before source {}", source.name());
                return Resolution::NotFound;
            }
            let candidates = source.candidates(&name, hints, self.fetcher.as_ref());
            tracing::debug!(
                source = source.name(),
                count = candidates.len(),
                "trying candidates for {}",
                name.display()
            );
            for url in candidates {
                if !tried.insert(url.clone()) {
                    continue;
                }
                if expired() {
                    tracing::debug!(name = raw_name, "deadline passed, abandoning remaining candidates");
                    return Resolution::NotFound;
                }
                match self.probe(&url) {
                    Ok(info) => {
                        tracing::info!(
                            source = source.name(),
                            url = %url,
                            width = info.width,
                            height = info.height,
                            "found photo for {}",
                            name.display()
                        );
                        return Resolution::Found(url);
                    }
                    Err(e) => {
                        tracing::debug!(source = source.name(), url = %url, error = %e, "candidate rejected");
                    }
                }
            }
        }
        tracing::debug!(name = raw_name, "no source produced a valid photo");
        Resolution::NotFound
    }

    fn probe(&self, url: &str) -> Result<ImageInfo, ProbeError> {
        let response = self.fetcher.get(url)?;
        Ok(validate_response(&response, &self.thresholds)?)
    }
}

#[cfg(test)]
mod tests;
