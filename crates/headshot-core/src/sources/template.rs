//! URL templates filled from name fragments.
//!
//! Placeholders are written `{key}` or `{key:N}` (first N characters). A key
//! starting with an uppercase letter capitalizes the value: `{Last:4}` turns
//! "mcmahon" into "Mcma". Values are form-encoded before insertion.

use anyhow::{bail, Result};

use super::{CandidateSource, SourceFilter};
use crate::config::SourceConfig;
use crate::fetch::Fetcher;
use crate::hints::{Hints, Sport};
use crate::name::PlayerName;

/// Keys a `template` source may use (case-insensitive).
pub const NAME_PLACEHOLDERS: &[&str] = &["first", "last", "f", "league", "name", "org"];

/// Fill `template` using `lookup` for each placeholder key (lowercased).
///
/// Returns `None` when any placeholder has no value, so a half-filled URL is
/// never probed.
pub fn expand(template: &str, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return Some(out);
        };
        let spec = Placeholder::parse(&after[..close])?;
        let value = lookup(&spec.key.to_ascii_lowercase())?;
        out.push_str(&spec.apply(&value));
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Some(out)
}

/// Placeholder keys used in `template`, lowercased.
fn placeholder_keys(template: &str) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else { break };
        let Some(spec) = Placeholder::parse(&after[..close]) else {
            bail!("malformed placeholder {{{}}} in {template:?}", &after[..close]);
        };
        keys.push(spec.key.to_ascii_lowercase());
        rest = &after[close + 1..];
    }
    Ok(keys)
}

/// Check that `template` only uses `allowed` keys and uses every `required` one.
pub(crate) fn check_template(template: &str, allowed: &[&str], required: &[&str]) -> Result<()> {
    let keys = placeholder_keys(template)?;
    if let Some(unknown) = keys.iter().find(|k| !allowed.contains(&k.as_str())) {
        bail!("unknown placeholder {{{unknown}}} in {template:?}");
    }
    if let Some(missing) = required.iter().find(|r| !keys.iter().any(|k| k == *r)) {
        bail!("template {template:?} must contain {{{missing}}}");
    }
    Ok(())
}

struct Placeholder<'a> {
    key: &'a str,
    take: Option<usize>,
    capitalize: bool,
}

impl<'a> Placeholder<'a> {
    fn parse(raw: &'a str) -> Option<Self> {
        let (key, take) = match raw.split_once(':') {
            Some((k, n)) => (k, Some(n.trim().parse::<usize>().ok()?)),
            None => (raw, None),
        };
        let key = key.trim();
        let first = key.chars().next()?;
        if !key.chars().all(|c| c.is_ascii_alphabetic() || c == '_') {
            return None;
        }
        Some(Self {
            key,
            take,
            capitalize: first.is_ascii_uppercase(),
        })
    }

    fn apply(&self, value: &str) -> String {
        let truncated: String = match self.take {
            Some(n) => value.chars().take(n).collect(),
            None => value.to_string(),
        };
        let shaped = if self.capitalize {
            let mut chars = truncated.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        } else {
            truncated
        };
        encode(&shaped)
    }
}

pub(crate) fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// `{league}` when no sport hint is given. Most stored players are football
/// players, and the CDN paths were first written for `nfl`.
const FALLBACK_LEAGUE: &str = "nfl";

/// Value of a name/hint placeholder key.
fn name_value(key: &str, name: &PlayerName, hints: &Hints) -> Option<String> {
    match key {
        "first" => Some(name.first().to_string()),
        "last" => Some(name.last().to_string()),
        "f" => name.first().chars().next().map(String::from),
        "league" => Some(hints.sport.map_or(FALLBACK_LEAGUE, Sport::league).to_string()),
        "name" => Some(name.display().to_string()),
        "org" => hints.organization.as_deref().map(slug).filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn slug(value: &str) -> String {
    value
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Deterministic source: every template is one candidate.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    name: String,
    filter: SourceFilter,
    templates: Vec<String>,
}

impl TemplateSource {
    pub fn new(name: impl Into<String>, filter: SourceFilter, templates: Vec<String>) -> Self {
        Self {
            name: name.into(),
            filter,
            templates,
        }
    }

    pub fn from_config(cfg: &SourceConfig) -> Result<Self> {
        if cfg.templates.is_empty() {
            bail!("source {:?} has no `templates`", cfg.name);
        }
        for t in &cfg.templates {
            check_template(t, NAME_PLACEHOLDERS, &[])?;
        }
        Ok(Self::new(
            cfg.name.clone(),
            SourceFilter::from_config(cfg),
            cfg.templates.clone(),
        ))
    }
}

impl CandidateSource for TemplateSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn applies_to(&self, hints: &Hints) -> bool {
        self.filter.matches(hints)
    }

    fn candidates(&self, name: &PlayerName, hints: &Hints, _fetcher: &dyn Fetcher) -> Vec<String> {
        self.templates
            .iter()
            .filter_map(|t| expand(t, |key| name_value(key, name, hints)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetcher;

    fn jim() -> PlayerName {
        PlayerName::parse("Jim McMahon").unwrap()
    }

    fn fill(template: &str, hints: &Hints) -> Option<String> {
        let name = jim();
        expand(template, |k| name_value(k, &name, hints))
    }

    #[test]
    fn espn_style_keys() {
        let h = Hints::for_sport(Sport::Football);
        assert_eq!(
            fill("https://cdn/{league}/{last}{f}.png", &h).as_deref(),
            Some("https://cdn/nfl/mcmahonj.png")
        );
        assert_eq!(
            fill("https://cdn/{league}/{f}{last}.png", &h).as_deref(),
            Some("https://cdn/nfl/jmcmahon.png")
        );
        assert_eq!(
            fill("https://cdn/{league}/{last}.png", &Hints::for_sport(Sport::Basketball)).as_deref(),
            Some("https://cdn/nba/mcmahon.png")
        );
    }

    #[test]
    fn league_without_sport_hint_falls_back_to_nfl() {
        assert_eq!(
            fill("https://cdn/{league}/{last}{f}.png", &Hints::default()).as_deref(),
            Some("https://cdn/nfl/mcmahonj.png")
        );
    }

    #[test]
    fn truncation_and_capitalization() {
        let h = Hints::default();
        assert_eq!(
            fill("/{Last:4}{First:2}00.jpg", &h).as_deref(),
            Some("/McmaJi00.jpg")
        );
        assert_eq!(fill("/{last:5}{first:2}01.jpg", &h).as_deref(), Some("/mcmahji01.jpg"));
        // Truncation longer than the value keeps the whole value.
        assert_eq!(fill("/{first:10}", &h).as_deref(), Some("/jim"));
    }

    #[test]
    fn unfillable_placeholder_drops_candidate() {
        assert_eq!(fill("/{org}/{last}.png", &Hints::default()), None);
        assert_eq!(fill("/{bogus}", &Hints::default()), None);
    }

    #[test]
    fn display_name_and_org_are_encoded() {
        let h = Hints::default().with_organization("Brigham Young (BYU)");
        assert_eq!(
            fill("/search?q={name}&team={org}", &h).as_deref(),
            Some("/search?q=Jim+McMahon&team=brigham-young-byu")
        );
    }

    #[test]
    fn unmatched_brace_is_literal() {
        assert_eq!(fill("/odd{last", &Hints::default()).as_deref(), Some("/odd{last"));
    }

    #[test]
    fn check_template_rules() {
        assert!(check_template("/{Last:4}{f}", NAME_PLACEHOLDERS, &[]).is_ok());
        assert!(check_template("/{id}.jpg", NAME_PLACEHOLDERS, &[]).is_err());
        assert!(check_template("/{last:x}", NAME_PLACEHOLDERS, &[]).is_err());
        assert!(check_template("/search?q=", &["query"], &["query"]).is_err());
        assert!(check_template("/search?q={query}", &["query"], &["query"]).is_ok());
    }

    #[test]
    fn source_keeps_template_order_and_skips_unfillable() {
        let source = TemplateSource::new(
            "cdn",
            SourceFilter::default(),
            vec![
                "https://a.example/{last}{f}.png".to_string(),
                "https://a.example/{org}/{f}{last}.png".to_string(),
                "https://a.example/{f}{last}.png".to_string(),
            ],
        );
        let mock = MockFetcher::new();
        let got = source.candidates(&jim(), &Hints::default(), &mock);
        assert_eq!(
            got,
            vec![
                "https://a.example/mcmahonj.png".to_string(),
                "https://a.example/jmcmahon.png".to_string(),
            ]
        );
        assert_eq!(mock.request_count(), 0, "template sources never fetch");
    }

    #[test]
    fn from_config_rejects_unknown_keys() {
        let mut cfg = crate::config::default_sources().remove(0);
        cfg.templates = vec!["https://x/{query}.png".to_string()];
        assert!(TemplateSource::from_config(&cfg).is_err());
        cfg.templates.clear();
        assert!(TemplateSource::from_config(&cfg).is_err());
    }
}
