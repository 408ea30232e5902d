//! MediaWiki page-image lookups.
//!
//! Two lookups, in order: the page titled exactly like the display name, then
//! the top full-text search hit for "<name> <sport> player". Each yields at
//! most one thumbnail URL.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use url::Url;

use super::{required, CandidateSource, SourceFilter};
use crate::config::SourceConfig;
use crate::fetch::Fetcher;
use crate::hints::Hints;
use crate::name::PlayerName;

const DEFAULT_THUMB_SIZE: u32 = 500;

#[derive(Debug, Deserialize)]
struct ApiResponse<Q> {
    query: Option<Q>,
}

#[derive(Debug, Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: BTreeMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Clone)]
pub struct WikipediaSource {
    name: String,
    filter: SourceFilter,
    api_url: Url,
    thumb_size: u32,
}

impl WikipediaSource {
    pub fn new(name: impl Into<String>, filter: SourceFilter, api_url: Url, thumb_size: u32) -> Self {
        Self {
            name: name.into(),
            filter,
            api_url,
            thumb_size,
        }
    }

    pub fn from_config(cfg: &SourceConfig) -> Result<Self> {
        let raw = required(&cfg.api_url, &cfg.name, "api_url")?;
        let api_url = Url::parse(raw)
            .with_context(|| format!("source {:?}: invalid api_url {raw:?}", cfg.name))?;
        Ok(Self::new(
            cfg.name.clone(),
            SourceFilter::from_config(cfg),
            api_url,
            cfg.thumb_size.unwrap_or(DEFAULT_THUMB_SIZE),
        ))
    }

    fn api_call(&self, params: &[(&str, &str)]) -> String {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("format", "json")
            .extend_pairs(params);
        url.into()
    }

    fn thumbnail_url(&self, title: &str) -> String {
        let size = self.thumb_size.to_string();
        self.api_call(&[
            ("prop", "pageimages"),
            ("titles", title),
            ("pithumbsize", &size),
            ("redirects", "1"),
        ])
    }

    fn search_url(&self, query: &str) -> String {
        self.api_call(&[
            ("list", "search"),
            ("srsearch", query),
            ("srlimit", "1"),
            ("utf8", "1"),
        ])
    }

    fn lookup<Q: for<'de> Deserialize<'de>>(&self, fetcher: &dyn Fetcher, url: &str) -> Option<Q> {
        let response = match fetcher.get(url) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(source = %self.name, url, error = %e, "lookup failed");
                return None;
            }
        };
        if !response.is_success() {
            tracing::debug!(source = %self.name, url, status = response.status, "lookup rejected");
            return None;
        }
        match serde_json::from_slice::<ApiResponse<Q>>(&response.body) {
            Ok(parsed) => parsed.query,
            Err(e) => {
                tracing::debug!(source = %self.name, url, error = %e, "lookup returned malformed JSON");
                None
            }
        }
    }

    fn thumbnail(&self, fetcher: &dyn Fetcher, title: &str) -> Option<String> {
        let pages: PagesQuery = self.lookup(fetcher, &self.thumbnail_url(title))?;
        pages
            .pages
            .into_values()
            .find_map(|p| p.thumbnail.map(|t| t.source))
    }

    fn top_search_title(&self, fetcher: &dyn Fetcher, query: &str) -> Option<String> {
        let results: SearchQuery = self.lookup(fetcher, &self.search_url(query))?;
        results.search.into_iter().next().map(|hit| hit.title)
    }
}

/// Free-text query for the search step.
pub(crate) fn search_query(name: &PlayerName, hints: &Hints) -> String {
    match hints.sport {
        Some(sport) => format!("{} {} player", name.display(), sport.search_noun()),
        None => format!("{} player", name.display()),
    }
}

impl CandidateSource for WikipediaSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn applies_to(&self, hints: &Hints) -> bool {
        self.filter.matches(hints)
    }

    fn candidates(&self, name: &PlayerName, hints: &Hints, fetcher: &dyn Fetcher) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(thumb) = self.thumbnail(fetcher, name.display()) {
            out.push(thumb);
        }
        if let Some(title) = self.top_search_title(fetcher, &search_query(name, hints)) {
            if title != name.display() {
                if let Some(thumb) = self.thumbnail(fetcher, &title) {
                    if !out.contains(&thumb) {
                        out.push(thumb);
                    }
                }
            }
        }
        out
    }
}
