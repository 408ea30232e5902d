//! Batch workflows over the player store: roster import, photo audit, tier
//! promotion and rating refresh.
//!
//! Resolution is blocking (libcurl), so every workflow runs it on the
//! blocking pool and keeps database access on the async side.

pub mod audit;
pub mod import;
pub mod promote;
pub mod ratings;

pub use audit::{audit_photos, AuditOptions, AuditReport};
pub use import::{import_roster, load_roster, parse_roster, ImportOptions, ImportReport};
pub use promote::{
    apply_promotions, load_promotions, parse_promotions, Promotion, PromotionFile,
    PromotionOutcome, PromotionReport, PromotionResult,
};
pub use ratings::{parse_stat_table, update_ratings, RatingsOptions, RatingsReport, StatRow};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::hints::Hints;
use crate::resolver::{PhotoResolver, Resolution};

/// What to do with a roster entry that is already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExistingPolicy {
    /// Leave the row alone and issue no requests for it.
    #[default]
    SkipIfExists,
    /// Re-resolve the photo and overwrite the row.
    ForceRefresh,
}

impl ExistingPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ExistingPolicy::SkipIfExists => "skip-if-exists",
            ExistingPolicy::ForceRefresh => "force-refresh",
        }
    }
}

impl fmt::Display for ExistingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExistingPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip-if-exists" | "skip" => Ok(ExistingPolicy::SkipIfExists),
            "force-refresh" | "force" => Ok(ExistingPolicy::ForceRefresh),
            other => bail!("unknown existing-player policy {other:?} (expected skip-if-exists or force-refresh)"),
        }
    }
}

/// What a `NotFound` resolution means for a new player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingPhotoPolicy {
    /// Do not store the player at all.
    #[default]
    Skip,
    /// Store the player with a null photo for later manual fixing.
    InsertNull,
}

impl MissingPhotoPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            MissingPhotoPolicy::Skip => "skip",
            MissingPhotoPolicy::InsertNull => "insert-null",
        }
    }
}

impl fmt::Display for MissingPhotoPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingPhotoPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(MissingPhotoPolicy::Skip),
            "insert-null" | "null" => Ok(MissingPhotoPolicy::InsertNull),
            other => bail!("unknown missing-photo policy {other:?} (expected skip or insert-null)"),
        }
    }
}

/// Run one resolution on the blocking pool.
pub(crate) async fn resolve_blocking(
    resolver: Arc<PhotoResolver>,
    name: String,
    hints: Hints,
) -> Result<Resolution> {
    tokio::task::spawn_blocking(move || resolver.resolve(&name, &hints))
        .await
        .map_err(|e| anyhow::anyhow!("resolve task join: {}", e))
}
