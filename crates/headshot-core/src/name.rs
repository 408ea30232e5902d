//! Player name normalization.
//!
//! Display names from rosters carry generational suffixes and punctuation
//! ("Jabari Smith Jr.", "P.J. Washington", "Manti Te'o") that break the
//! deterministic per-source lookup keys. `PlayerName` keeps both a cleaned
//! display form (for free-text search) and lowercase key tokens (for URL
//! interpolation).

use thiserror::Error;

/// Trailing tokens dropped before building lookup keys.
const SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv", "v"];

/// Why a name cannot be used for lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name is empty")]
    Empty,
    #[error("name {0:?} has fewer than two usable tokens")]
    TooFewTokens(String),
}

/// A normalized person name with at least two key tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName {
    display: String,
    tokens: Vec<String>,
}

impl PlayerName {
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let mut words: Vec<&str> = raw.split_whitespace().collect();
        if words.is_empty() {
            return Err(NameError::Empty);
        }
        while words.len() > 1 && words.last().is_some_and(|w| is_suffix(w)) {
            words.pop();
        }

        let display = words
            .iter()
            .map(|w| w.trim_end_matches(','))
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let tokens: Vec<String> = words.iter().filter_map(|w| key_token(w)).collect();
        if tokens.len() < 2 {
            return Err(NameError::TooFewTokens(raw.trim().to_string()));
        }

        Ok(Self { display, tokens })
    }

    /// Suffix-free name with original casing, e.g. "Jabari Smith".
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn first(&self) -> &str {
        &self.tokens[0]
    }

    pub fn last(&self) -> &str {
        &self.tokens[self.tokens.len() - 1]
    }
}

fn is_suffix(word: &str) -> bool {
    let bare = word.trim_matches(|c: char| c == '.' || c == ',').to_lowercase();
    SUFFIXES.contains(&bare.as_str())
}

/// Lowercase, keep letters/digits/hyphens only. `None` if nothing remains.
fn key_token(word: &str) -> Option<String> {
    let token: String = word
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .flat_map(char::to_lowercase)
        .collect();
    let token = token.trim_matches('-').to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
