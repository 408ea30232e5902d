//! Photo audit: find stored players whose photo is missing or broken and
//! re-resolve them.
//!
//! Keeps up to `jobs` players in flight at once; when one finishes, the next
//! is started until the list is exhausted. Database writes happen on the
//! driving task as results come back.

use anyhow::Result;
use std::sync::Arc;

use crate::hints::Sport;
use crate::players::{PlayerDb, PlayerId, PlayerRecord};
use crate::resolver::{PhotoResolver, Resolution};

#[derive(Debug, Clone, Copy)]
pub struct AuditOptions {
    pub sport: Option<Sport>,
    /// Players checked concurrently.
    pub jobs: usize,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            sport: None,
            jobs: 4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub checked: usize,
    /// Stored photo still validates.
    pub healthy: usize,
    /// Missing or broken photo replaced.
    pub fixed: usize,
    /// Missing or broken photo with no replacement found.
    pub unresolved: Vec<String>,
}

enum Verdict {
    Healthy,
    Fixed(String),
    Unresolved,
}

fn audit_one(resolver: &PhotoResolver, player: &PlayerRecord) -> Verdict {
    if !player.lacks_photo() {
        if let Some(url) = player.image_url.as_deref() {
            if resolver.check_url(url.trim()) {
                return Verdict::Healthy;
            }
            tracing::info!(name = %player.name, url, "stored photo is broken");
        }
    }
    match resolver.resolve(&player.name, &player.hints()) {
        Resolution::Found(url) => Verdict::Fixed(url),
        Resolution::NotFound => Verdict::Unresolved,
    }
}

/// Check every stored player (optionally one sport) and replace missing or
/// broken photos.
pub async fn audit_photos(
    db: &PlayerDb,
    resolver: Arc<PhotoResolver>,
    opts: AuditOptions,
) -> Result<AuditReport> {
    let jobs = opts.jobs.max(1);
    let mut pending = db.list_players(opts.sport).await?.into_iter();
    let mut report = AuditReport::default();
    let mut join_set: tokio::task::JoinSet<(PlayerId, String, Verdict)> =
        tokio::task::JoinSet::new();

    loop {
        while join_set.len() < jobs {
            let Some(player) = pending.next() else {
                break;
            };
            let resolver = Arc::clone(&resolver);
            join_set.spawn_blocking(move || {
                let verdict = audit_one(&resolver, &player);
                (player.id, player.name, verdict)
            });
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        let (id, name, verdict) = res.map_err(|e| anyhow::anyhow!("audit task join: {}", e))?;
        report.checked += 1;
        match verdict {
            Verdict::Healthy => report.healthy += 1,
            Verdict::Fixed(url) => {
                db.set_image_url(id, Some(&url)).await?;
                tracing::info!(id, name = %name, url = %url, "photo replaced");
                report.fixed += 1;
            }
            Verdict::Unresolved => {
                tracing::warn!(id, name = %name, "no replacement photo found");
                report.unresolved.push(name);
            }
        }
    }

    report.unresolved.sort();
    Ok(report)
}
