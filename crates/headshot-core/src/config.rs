use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::hints::Sport;

/// How a source produces candidate URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Deterministic interpolation of name fragments into URL templates.
    Template,
    /// Encyclopedia page-image lookup (exact title, then free-text search).
    Wikipedia,
    /// Search page -> record id -> image URL.
    ReferenceSearch,
}

/// One entry of the ordered `[[sources]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub kind: SourceKind,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Only try this source for these sports (empty = any).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sports: Vec<Sport>,
    /// Only try this source for these positions (empty = any).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<String>,
    /// `template`: URL templates, tried in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<String>,
    /// `wikipedia`: MediaWiki API endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// `wikipedia`: requested thumbnail edge in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb_size: Option<u32>,
    /// `reference-search`: search page template containing `{query}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_url: Option<String>,
    /// `reference-search`: regex whose first capture group is the record id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_pattern: Option<String>,
    /// `reference-search`: image URL template containing `{id}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_template: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl SourceConfig {
    fn template(name: &str, sports: &[Sport], templates: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind: SourceKind::Template,
            enabled: true,
            sports: sports.to_vec(),
            positions: Vec::new(),
            templates: templates.iter().map(|t| t.to_string()).collect(),
            api_url: None,
            thumb_size: None,
            search_url: None,
            id_pattern: None,
            image_template: None,
        }
    }
}

/// Global configuration loaded from `~/.config/headshot/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Candidates narrower than this are placeholders, not headshots.
    pub min_width: u32,
    pub min_height: u32,
    /// Per-probe timeout in seconds (whole exchange).
    pub request_timeout: u64,
    /// Per-probe connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    pub user_agent: String,
    /// Probes whose body grows past this are abandoned, so an otherwise
    /// valid image above the cap is rejected. This is the one case where
    /// payload size alone decides validity.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Minimum spacing between requests to one host in batch workflows.
    #[serde(default = "default_per_host_delay_ms")]
    pub per_host_delay_ms: u64,
    /// Candidate sources in priority order.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

fn default_connect_timeout() -> u64 {
    3
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_per_host_delay_ms() -> u64 {
    300
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_width: 10,
            min_height: 10,
            request_timeout: 4,
            connect_timeout: default_connect_timeout(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            max_body_bytes: default_max_body_bytes(),
            per_host_delay_ms: default_per_host_delay_ms(),
            sources: default_sources(),
        }
    }
}

/// Built-in source table, most structured first.
pub fn default_sources() -> Vec<SourceConfig> {
    let mut two_sport = SourceConfig::template(
        "basketball-reference-two-sport",
        &[Sport::Football],
        &["https://www.basketball-reference.com/req/202106291/images/headshots/{last:5}{first:2}01.jpg"],
    );
    two_sport.positions = vec!["QB".to_string()];

    vec![
        SourceConfig::template(
            "espn",
            &[],
            &[
                "https://a.espncdn.com/combiner/i?img=/i/headshots/{league}/players/full/{last}{f}.png",
                "https://a.espncdn.com/combiner/i?img=/i/headshots/{league}/players/full/{f}{last}.png",
            ],
        ),
        SourceConfig::template(
            "pro-football-reference",
            &[Sport::Football],
            &[
                "https://www.pro-football-reference.com/req/202106291/images/headshots/{Last:4}{First:2}00.jpg",
                "https://www.pro-football-reference.com/req/202106291/images/headshots/{Last:4}{First:2}01.jpg",
            ],
        ),
        SourceConfig {
            name: "wikipedia".to_string(),
            kind: SourceKind::Wikipedia,
            enabled: true,
            sports: Vec::new(),
            positions: Vec::new(),
            templates: Vec::new(),
            api_url: Some("https://en.wikipedia.org/w/api.php".to_string()),
            thumb_size: Some(500),
            search_url: None,
            id_pattern: None,
            image_template: None,
        },
        SourceConfig::template(
            "college-football-reference",
            &[Sport::Football],
            &[
                "https://www.sports-reference.com/cfb/players/{last}-{first}-1.jpg",
                "https://www.sports-reference.com/cfb/players/{last}-{first}.jpg",
            ],
        ),
        SourceConfig {
            name: "basketball-reference".to_string(),
            kind: SourceKind::ReferenceSearch,
            enabled: true,
            sports: vec![Sport::Basketball],
            positions: Vec::new(),
            templates: Vec::new(),
            api_url: None,
            thumb_size: None,
            search_url: Some(
                "https://www.basketball-reference.com/search/search.fcgi?search={query}"
                    .to_string(),
            ),
            id_pattern: Some(r"/players/[a-z]/([a-z0-9]+)\.html".to_string()),
            image_template: Some(
                "https://www.basketball-reference.com/req/202106291/images/headshots/{id}.jpg"
                    .to_string(),
            ),
        },
        two_sport,
    ]
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("headshot")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ResolverConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ResolverConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit file (no default is written).
pub fn load_from_path(path: &Path) -> Result<ResolverConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: ResolverConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
