//! Tier promotion: move named players from one tier to another.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::hints::Sport;
use crate::players::PlayerDb;

/// One `[[promotion]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Promotion {
    pub sport: Sport,
    pub from: i64,
    pub to: i64,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PromotionFile {
    #[serde(default, rename = "promotion")]
    pub promotions: Vec<Promotion>,
}

pub fn parse_promotions(text: &str) -> Result<PromotionFile> {
    let file: PromotionFile = toml::from_str(text)?;
    for p in &file.promotions {
        if p.from == p.to {
            bail!("promotion {} -> {} for {} is a no-op", p.from, p.to, p.sport);
        }
    }
    Ok(file)
}

pub fn load_promotions(path: &Path) -> Result<PromotionFile> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read promotions {}", path.display()))?;
    parse_promotions(&data).with_context(|| format!("parse promotions {}", path.display()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionOutcome {
    Promoted,
    AlreadyAtTarget,
    /// Current tier is neither the expected source nor the target.
    TierMismatch(Option<i64>),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionResult {
    pub name: String,
    pub sport: Sport,
    pub from: i64,
    pub to: i64,
    pub outcome: PromotionOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromotionReport {
    pub results: Vec<PromotionResult>,
}

impl PromotionReport {
    pub fn count(&self, outcome: PromotionOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn promoted(&self) -> usize {
        self.count(PromotionOutcome::Promoted)
    }
}

/// Apply every promotion in file order. A player is only moved when its
/// current tier equals the promotion's `from`.
pub async fn apply_promotions(db: &PlayerDb, file: &PromotionFile) -> Result<PromotionReport> {
    let mut report = PromotionReport::default();
    for promotion in &file.promotions {
        for name in &promotion.names {
            let outcome = match db.find_by_name(name, promotion.sport).await? {
                None => PromotionOutcome::NotFound,
                Some(p) if p.tier == Some(promotion.to) => PromotionOutcome::AlreadyAtTarget,
                Some(p) if p.tier == Some(promotion.from) => {
                    db.set_tier(name, promotion.sport, promotion.to).await?;
                    PromotionOutcome::Promoted
                }
                Some(p) => PromotionOutcome::TierMismatch(p.tier),
            };
            tracing::debug!(name = %name, sport = %promotion.sport, ?outcome, "promotion");
            report.results.push(PromotionResult {
                name: name.clone(),
                sport: promotion.sport,
                from: promotion.from,
                to: promotion.to,
                outcome,
            });
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::db::open_memory;
    use crate::players::NewPlayer;

    const FILE: &str = r#"
        [[promotion]]
        sport = "football"
        from = 2
        to = 1
        names = ["Mark Ingram", "Eric Crouch", "Barry Sanders", "Ghost Player"]

        [[promotion]]
        sport = "football"
        from = 3
        to = 2
        names = ["Pat White"]
    "#;

    async fn seed(db: &PlayerDb, name: &str, tier: i64) {
        let p = NewPlayer {
            tier: Some(tier),
            ..NewPlayer::new(name, Sport::Football)
        };
        db.insert_player(&p).await.unwrap();
    }

    #[test]
    fn parse_rejects_same_tier() {
        assert_eq!(parse_promotions(FILE).unwrap().promotions.len(), 2);
        let bad = "[[promotion]]\nsport = \"football\"\nfrom = 2\nto = 2\nnames = []\n";
        assert!(parse_promotions(bad).is_err());
        assert!(parse_promotions("").unwrap().promotions.is_empty());
    }

    #[tokio::test]
    async fn promotes_only_from_expected_tier() {
        let db = open_memory().await.unwrap();
        seed(&db, "Mark Ingram", 2).await;
        seed(&db, "Eric Crouch", 3).await;
        seed(&db, "Barry Sanders", 1).await;
        seed(&db, "Pat White", 3).await;

        let report = apply_promotions(&db, &parse_promotions(FILE).unwrap())
            .await
            .unwrap();
        let outcomes: Vec<(&str, PromotionOutcome)> = report
            .results
            .iter()
            .map(|r| (r.name.as_str(), r.outcome))
            .collect();
        assert_eq!(
            outcomes,
            vec![
                ("Mark Ingram", PromotionOutcome::Promoted),
                ("Eric Crouch", PromotionOutcome::TierMismatch(Some(3))),
                ("Barry Sanders", PromotionOutcome::AlreadyAtTarget),
                ("Ghost Player", PromotionOutcome::NotFound),
                ("Pat White", PromotionOutcome::Promoted),
            ]
        );
        assert_eq!(report.promoted(), 2);

        let ingram = db.find_by_name("Mark Ingram", Sport::Football).await.unwrap().unwrap();
        assert_eq!(ingram.tier, Some(1));
        let crouch = db.find_by_name("Eric Crouch", Sport::Football).await.unwrap().unwrap();
        assert_eq!(crouch.tier, Some(3));
        assert_eq!(
            db.tier_counts(Sport::Football).await.unwrap(),
            vec![(1, 2), (2, 1), (3, 1)]
        );
    }
}
