//! Candidate sources.
//!
//! Each source turns a normalized name (plus hints) into zero or more image
//! URLs to probe, in a fixed trial order. The resolver walks an ordered list
//! of sources built from config; it never needs to know which provider a
//! source talks to.

mod reference_search;
mod template;
mod wikipedia;

pub use reference_search::ReferenceSearchSource;
pub use template::{expand, TemplateSource, NAME_PLACEHOLDERS};
pub use wikipedia::WikipediaSource;

use anyhow::{Context, Result};

use crate::config::{ResolverConfig, SourceConfig, SourceKind};
use crate::fetch::Fetcher;
use crate::hints::{Hints, Sport};
use crate::name::PlayerName;

/// A provider of candidate headshot URLs.
pub trait CandidateSource: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this source should be tried at all for these hints.
    fn applies_to(&self, _hints: &Hints) -> bool {
        true
    }

    /// Candidate URLs in trial order. Sources that need an intermediate
    /// lookup perform it through `fetcher`; lookup failures yield no
    /// candidates rather than an error.
    fn candidates(&self, name: &PlayerName, hints: &Hints, fetcher: &dyn Fetcher) -> Vec<String>;
}

/// Sport/position restriction shared by all source kinds. An unset hint
/// never excludes a source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFilter {
    pub sports: Vec<Sport>,
    pub positions: Vec<String>,
}

impl SourceFilter {
    pub fn from_config(cfg: &SourceConfig) -> Self {
        Self {
            sports: cfg.sports.clone(),
            positions: cfg.positions.clone(),
        }
    }

    pub fn matches(&self, hints: &Hints) -> bool {
        if let Some(sport) = hints.sport {
            if !self.sports.is_empty() && !self.sports.contains(&sport) {
                return false;
            }
        }
        if let Some(position) = hints.position.as_deref() {
            if !self.positions.is_empty()
                && !self
                    .positions
                    .iter()
                    .any(|p| p.eq_ignore_ascii_case(position.trim()))
            {
                return false;
            }
        }
        true
    }
}

/// Instantiate the enabled sources in configured order.
pub fn build_sources(cfg: &ResolverConfig) -> Result<Vec<Box<dyn CandidateSource>>> {
    let mut out: Vec<Box<dyn CandidateSource>> = Vec::new();
    for source in cfg.sources.iter().filter(|s| s.enabled) {
        let built: Box<dyn CandidateSource> = match source.kind {
            SourceKind::Template => Box::new(TemplateSource::from_config(source)?),
            SourceKind::Wikipedia => Box::new(WikipediaSource::from_config(source)?),
            SourceKind::ReferenceSearch => Box::new(ReferenceSearchSource::from_config(source)?),
        };
        out.push(built);
    }
    Ok(out)
}

/// Config field that must be present for a source kind.
pub(crate) fn required<'a>(value: &'a Option<String>, source: &str, field: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("source {source:?} is missing `{field}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_sources;

    #[test]
    fn filter_ignores_missing_hints() {
        let filter = SourceFilter {
            sports: vec![Sport::Football],
            positions: vec!["QB".to_string()],
        };
        assert!(filter.matches(&Hints::default()));
        assert!(filter.matches(&Hints::for_sport(Sport::Football)));
        assert!(filter.matches(&Hints::for_sport(Sport::Football).with_position("qb")));
        assert!(!filter.matches(&Hints::for_sport(Sport::Basketball)));
        assert!(!filter.matches(&Hints::for_sport(Sport::Football).with_position("RB")));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = SourceFilter::default();
        assert!(filter.matches(&Hints::for_sport(Sport::Basketball).with_position("C")));
    }

    #[test]
    fn default_sources_build_in_order() {
        let cfg = ResolverConfig::default();
        let sources = build_sources(&cfg).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        let defaults = default_sources();
        let expected: Vec<&str> = defaults.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn disabled_sources_are_skipped() {
        let mut cfg = ResolverConfig::default();
        cfg.sources[0].enabled = false;
        cfg.sources[2].enabled = false;
        let sources = build_sources(&cfg).unwrap();
        assert_eq!(sources.len(), cfg.sources.len() - 2);
        assert_eq!(sources[0].name(), "pro-football-reference");
    }

    #[test]
    fn misconfigured_source_is_rejected() {
        let mut cfg = ResolverConfig::default();
        cfg.sources[2].api_url = None;
        let err = build_sources(&cfg).err().unwrap();
        assert!(err.to_string().contains("api_url"), "{err:#}");
    }
}
