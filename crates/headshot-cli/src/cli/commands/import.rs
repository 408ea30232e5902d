//! `headshot import` – import a roster file.

use anyhow::Result;
use headshot_core::config::ResolverConfig;
use headshot_core::players::PlayerDb;
use headshot_core::workflow::{
    import_roster, load_roster, ExistingPolicy, ImportOptions, MissingPhotoPolicy,
};
use std::path::Path;

use super::batch_resolver;

pub async fn run_import(
    db: &PlayerDb,
    cfg: &ResolverConfig,
    roster: &Path,
    existing: ExistingPolicy,
    missing_photo: MissingPhotoPolicy,
    limit: Option<usize>,
) -> Result<()> {
    let entries = load_roster(roster)?;
    let resolver = batch_resolver(cfg)?;
    let opts = ImportOptions {
        existing,
        missing_photo,
        limit,
    };
    tracing::info!(
        entries = entries.len(),
        %existing,
        %missing_photo,
        "importing {}",
        roster.display()
    );

    let report = import_roster(db, resolver, &entries, opts).await?;
    println!(
        "inserted {} ({} without photo), refreshed {}, skipped {} existing, skipped {} without photo",
        report.inserted,
        report.inserted_without_photo,
        report.refreshed,
        report.skipped_existing,
        report.skipped_no_photo
    );
    if report.unresolved > 0 {
        println!("{} lookups found no valid photo", report.unresolved);
    }
    Ok(())
}
