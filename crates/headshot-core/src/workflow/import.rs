//! Roster import: resolve a photo for each roster entry and store it.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::{resolve_blocking, ExistingPolicy, MissingPhotoPolicy};
use crate::players::{NewPlayer, PlayerDb};
use crate::resolver::{PhotoResolver, Resolution};

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    player: Vec<NewPlayer>,
}

/// Parse a roster TOML document (`[[player]]` tables).
pub fn parse_roster(text: &str) -> Result<Vec<NewPlayer>> {
    let file: RosterFile = toml::from_str(text)?;
    Ok(file.player)
}

pub fn load_roster(path: &Path) -> Result<Vec<NewPlayer>> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read roster {}", path.display()))?;
    parse_roster(&data).with_context(|| format!("parse roster {}", path.display()))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    pub existing: ExistingPolicy,
    pub missing_photo: MissingPhotoPolicy,
    /// Only consider the first N roster entries.
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// New rows, with or without a photo.
    pub inserted: usize,
    /// New rows stored with a null photo.
    pub inserted_without_photo: usize,
    /// Existing rows updated under `force-refresh`.
    pub refreshed: usize,
    pub skipped_existing: usize,
    /// New players dropped because no photo was found.
    pub skipped_no_photo: usize,
    /// Resolutions that came back `NotFound`.
    pub unresolved: usize,
}

/// Import `entries` in order.
///
/// A roster entry that already carries an `image_url` is stored as given.
/// Under `force-refresh`, the entry is merged over the existing row: fields it
/// leaves unset (including a photo that cannot be resolved) keep their stored
/// values.
pub async fn import_roster(
    db: &PlayerDb,
    resolver: Arc<PhotoResolver>,
    entries: &[NewPlayer],
    opts: ImportOptions,
) -> Result<ImportReport> {
    let mut report = ImportReport::default();
    let limit = opts.limit.unwrap_or(entries.len());

    for entry in entries.iter().take(limit) {
        let existing = db.find_by_name(&entry.name, entry.sport).await?;
        if existing.is_some() && opts.existing == ExistingPolicy::SkipIfExists {
            tracing::debug!(name = %entry.name, sport = %entry.sport, "already stored, skipping");
            report.skipped_existing += 1;
            continue;
        }

        let mut player = entry.clone();
        if player.image_url.is_none() {
            match resolve_blocking(Arc::clone(&resolver), entry.name.clone(), entry.hints()).await? {
                Resolution::Found(url) => player.image_url = Some(url),
                Resolution::NotFound => {
                    report.unresolved += 1;
                    match (&existing, opts.missing_photo) {
                        (Some(row), _) => player.image_url = row.image_url.clone(),
                        (None, MissingPhotoPolicy::Skip) => {
                            tracing::info!(name = %entry.name, "no photo found, not importing");
                            report.skipped_no_photo += 1;
                            continue;
                        }
                        (None, MissingPhotoPolicy::InsertNull) => {}
                    }
                }
            }
        }

        if existing.is_some() {
            db.upsert_player(&player).await?;
            tracing::info!(name = %player.name, sport = %player.sport, "refreshed");
            report.refreshed += 1;
            continue;
        }

        match db.insert_player(&player).await? {
            Some(id) => {
                tracing::info!(id, name = %player.name, photo = ?player.image_url, "imported");
                report.inserted += 1;
                if player.image_url.is_none() {
                    report.inserted_without_photo += 1;
                }
            }
            None => report.skipped_existing += 1,
        }
    }

    Ok(report)
}
