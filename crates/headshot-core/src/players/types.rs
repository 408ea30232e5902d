//! Row types for the player store.

use serde::{Deserialize, Serialize};

use crate::hints::{Hints, Sport};

pub type PlayerId = i64;

/// Legacy marker some rows carry instead of a real photo URL.
pub const PLACEHOLDER_IMAGE: &str = "i";

/// A stored player row.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub sport: Sport,
    pub team: Option<String>,
    pub position: Option<String>,
    pub college: Option<String>,
    pub image_url: Option<String>,
    pub tier: Option<i64>,
    pub rating: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PlayerRecord {
    pub fn hints(&self) -> Hints {
        metadata_hints(
            self.sport,
            self.position.as_deref(),
            self.team.as_deref(),
            self.college.as_deref(),
        )
    }

    /// No usable photo URL stored (null, blank, the placeholder, or not http).
    pub fn lacks_photo(&self) -> bool {
        match self.image_url.as_deref().map(str::trim) {
            None | Some("") | Some(PLACEHOLDER_IMAGE) => true,
            Some(url) => !url.starts_with("http"),
        }
    }
}

/// Fields for a new row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub sport: Sport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
}

impl NewPlayer {
    pub fn new(name: impl Into<String>, sport: Sport) -> Self {
        Self {
            name: name.into(),
            sport,
            team: None,
            position: None,
            college: None,
            image_url: None,
            tier: None,
            rating: None,
        }
    }

    pub fn hints(&self) -> Hints {
        metadata_hints(
            self.sport,
            self.position.as_deref(),
            self.team.as_deref(),
            self.college.as_deref(),
        )
    }
}

/// Resolver hints from roster metadata. College players are looked up by
/// college, everyone else by team.
fn metadata_hints(
    sport: Sport,
    position: Option<&str>,
    team: Option<&str>,
    college: Option<&str>,
) -> Hints {
    let present = |v: &&str| !v.trim().is_empty();
    let mut hints = Hints::for_sport(sport);
    if let Some(position) = position.filter(present) {
        hints = hints.with_position(position.trim());
    }
    if let Some(org) = college.filter(present).or(team.filter(present)) {
        hints = hints.with_organization(org.trim());
    }
    hints
}
