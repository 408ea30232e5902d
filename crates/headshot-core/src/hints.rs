//! Optional disambiguating hints passed alongside a name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sports the player database covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Football,
    Basketball,
}

impl Sport {
    pub fn as_str(self) -> &'static str {
        match self {
            Sport::Football => "football",
            Sport::Basketball => "basketball",
        }
    }

    /// League segment used by CDN path templates.
    pub fn league(self) -> &'static str {
        match self {
            Sport::Football => "nfl",
            Sport::Basketball => "nba",
        }
    }

    /// Word appended to encyclopedia searches ("<name> <noun> player").
    pub fn search_noun(self) -> &'static str {
        match self {
            Sport::Football => "American football",
            Sport::Basketball => "basketball",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sport {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "football" | "nfl" | "cfb" => Ok(Sport::Football),
            "basketball" | "nba" => Ok(Sport::Basketball),
            other => anyhow::bail!("unknown sport: {other}"),
        }
    }
}

/// Hints narrowing which sources apply and how they build lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hints {
    pub sport: Option<Sport>,
    /// Position or role, e.g. "QB".
    pub position: Option<String>,
    /// Team or college.
    pub organization: Option<String>,
}

impl Hints {
    pub fn for_sport(sport: Sport) -> Self {
        Self {
            sport: Some(sport),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }
}
