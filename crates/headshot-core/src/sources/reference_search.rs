//! Reference-site search: name -> canonical record id -> headshot URL.
//!
//! Stats reference sites redirect an unambiguous search straight to the
//! player page and otherwise render a result list. Either way the record id
//! is recoverable with one regex, checked against the final URL first and
//! the page body second.

use anyhow::{bail, Context, Result};
use regex::Regex;

use super::template::{check_template, expand};
use super::{required, CandidateSource, SourceFilter};
use crate::config::SourceConfig;
use crate::fetch::Fetcher;
use crate::hints::Hints;
use crate::name::PlayerName;

#[derive(Debug, Clone)]
pub struct ReferenceSearchSource {
    name: String,
    filter: SourceFilter,
    search_url: String,
    id_pattern: Regex,
    image_template: String,
}

impl ReferenceSearchSource {
    pub fn from_config(cfg: &SourceConfig) -> Result<Self> {
        let search_url = required(&cfg.search_url, &cfg.name, "search_url")?;
        let pattern = required(&cfg.id_pattern, &cfg.name, "id_pattern")?;
        let image_template = required(&cfg.image_template, &cfg.name, "image_template")?;

        check_template(search_url, &["query"], &["query"])
            .with_context(|| format!("source {:?}: search_url", cfg.name))?;
        check_template(image_template, &["id"], &["id"])
            .with_context(|| format!("source {:?}: image_template", cfg.name))?;

        let id_pattern = Regex::new(pattern)
            .with_context(|| format!("source {:?}: invalid id_pattern", cfg.name))?;
        if id_pattern.captures_len() < 2 {
            bail!("source {:?}: id_pattern needs a capture group", cfg.name);
        }

        Ok(Self {
            name: cfg.name.clone(),
            filter: SourceFilter::from_config(cfg),
            search_url: search_url.to_string(),
            id_pattern,
            image_template: image_template.to_string(),
        })
    }

    fn capture_id(&self, haystack: &str) -> Option<String> {
        self.id_pattern
            .captures(haystack)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Record id for `query`, or `None` when the search fails or finds nothing.
    fn lookup_id(&self, fetcher: &dyn Fetcher, query: &str) -> Option<String> {
        let url = expand(&self.search_url, |k| (k == "query").then(|| query.to_string()))?;
        let response = match fetcher.get(&url) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(source = %self.name, url = %url, error = %e, "search failed");
                return None;
            }
        };
        if !response.is_success() {
            tracing::debug!(source = %self.name, url = %url, status = response.status, "search rejected");
            return None;
        }
        response
            .final_url
            .as_deref()
            .and_then(|u| self.capture_id(u))
            .or_else(|| self.capture_id(&response.text()))
    }
}

impl CandidateSource for ReferenceSearchSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn applies_to(&self, hints: &Hints) -> bool {
        self.filter.matches(hints)
    }

    fn candidates(&self, name: &PlayerName, _hints: &Hints, fetcher: &dyn Fetcher) -> Vec<String> {
        let Some(id) = self.lookup_id(fetcher, name.display()) else {
            return Vec::new();
        };
        expand(&self.image_template, |k| (k == "id").then(|| id.clone()))
            .into_iter()
            .collect()
    }
}
