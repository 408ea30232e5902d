//! `headshot resolve` and `headshot check`: one-off lookups, no database.

use anyhow::{bail, Result};
use headshot_core::config::ResolverConfig;
use headshot_core::{Hints, PhotoResolver, Resolution};
use std::time::{Duration, Instant};

pub async fn run_resolve(
    cfg: &ResolverConfig,
    name: String,
    hints: Hints,
    deadline_secs: Option<u64>,
) -> Result<()> {
    let resolver = PhotoResolver::from_config(cfg)?;
    let deadline = deadline_secs.map(|s| Instant::now() + Duration::from_secs(s));
    let lookup = name.clone();
    let resolution = tokio::task::spawn_blocking(move || match deadline {
        Some(deadline) => resolver.resolve_before(&lookup, &hints, deadline),
        None => resolver.resolve(&lookup, &hints),
    })
    .await
    .map_err(|e| anyhow::anyhow!("resolve task join: {}", e))?;

    match resolution {
        Resolution::Found(url) => {
            println!("{url}");
            Ok(())
        }
        Resolution::NotFound => bail!("no valid headshot found for {name:?}"),
    }
}

pub async fn run_check(cfg: &ResolverConfig, url: String) -> Result<()> {
    let resolver = PhotoResolver::from_config(cfg)?;
    let target = url.clone();
    let ok = tokio::task::spawn_blocking(move || resolver.check_url(&target))
        .await
        .map_err(|e| anyhow::anyhow!("check task join: {}", e))?;
    if !ok {
        bail!("{url} is not a valid headshot");
    }
    println!("ok {url}");
    Ok(())
}
