//! `headshot ratings` – refresh ratings from a scraped stats table.

use anyhow::Result;
use headshot_core::config::ResolverConfig;
use headshot_core::fetch::{CurlFetcher, FetchOptions};
use headshot_core::players::PlayerDb;
use headshot_core::workflow::{update_ratings, RatingsOptions};
use std::sync::Arc;
use std::time::Duration;

pub async fn run_ratings(
    db: &PlayerDb,
    cfg: &ResolverConfig,
    opts: &RatingsOptions,
    timeout_secs: u64,
) -> Result<()> {
    // Stats pages are much larger than headshots and get their own timeout.
    let fetch_opts = FetchOptions {
        request_timeout: Duration::from_secs(timeout_secs),
        ..FetchOptions::from_config(cfg)
    };
    let fetcher = Arc::new(CurlFetcher::new(fetch_opts));
    let report = update_ratings(db, fetcher, opts).await?;

    println!(
        "{} rows, {} at or above {}, {} updated",
        report.scraped, report.qualified, opts.min_value, report.updated
    );
    for name in &report.not_stored {
        println!("  not stored: {name}");
    }
    Ok(())
}
