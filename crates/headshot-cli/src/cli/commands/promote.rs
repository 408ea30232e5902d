//! `headshot promote` – apply tier promotions.

use anyhow::Result;
use headshot_core::players::PlayerDb;
use headshot_core::workflow::{apply_promotions, load_promotions, PromotionOutcome};
use headshot_core::Sport;
use std::collections::BTreeSet;
use std::path::Path;

pub async fn run_promote(db: &PlayerDb, file: &Path) -> Result<()> {
    let promotions = load_promotions(file)?;
    let report = apply_promotions(db, &promotions).await?;

    for r in &report.results {
        let note = match r.outcome {
            PromotionOutcome::Promoted => format!("tier {} -> {}", r.from, r.to),
            PromotionOutcome::AlreadyAtTarget => format!("already tier {}", r.to),
            PromotionOutcome::TierMismatch(Some(t)) => format!("currently tier {t}, left alone"),
            PromotionOutcome::TierMismatch(None) => "untiered, left alone".to_string(),
            PromotionOutcome::NotFound => "not found".to_string(),
        };
        println!("{:<30} {:<11} {}", r.name, r.sport.as_str(), note);
    }
    println!("promoted {} of {}", report.promoted(), report.results.len());

    let sports: BTreeSet<&str> = report.results.iter().map(|r| r.sport.as_str()).collect();
    for sport in sports {
        let sport: Sport = sport.parse()?;
        let counts = db.tier_counts(sport).await?;
        let line: Vec<String> = counts.iter().map(|(t, n)| format!("tier {t}: {n}")).collect();
        println!("{sport} distribution: {}", line.join(", "));
    }
    Ok(())
}
