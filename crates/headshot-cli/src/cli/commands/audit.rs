//! `headshot audit` – repair missing or broken photos.

use anyhow::Result;
use headshot_core::config::ResolverConfig;
use headshot_core::players::PlayerDb;
use headshot_core::workflow::{audit_photos, AuditOptions};
use headshot_core::Sport;

use super::batch_resolver;

pub async fn run_audit(
    db: &PlayerDb,
    cfg: &ResolverConfig,
    sport: Option<Sport>,
    jobs: usize,
) -> Result<()> {
    let resolver = batch_resolver(cfg)?;
    let report = audit_photos(db, resolver, AuditOptions { sport, jobs }).await?;
    println!(
        "checked {}: {} healthy, {} fixed, {} unresolved",
        report.checked,
        report.healthy,
        report.fixed,
        report.unresolved.len()
    );
    for name in &report.unresolved {
        println!("  no photo: {name}");
    }
    Ok(())
}
