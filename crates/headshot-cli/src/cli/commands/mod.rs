//! CLI command handlers, one file per command.

mod audit;
mod import;
mod list;
mod promote;
mod ratings;
mod resolve;

pub use audit::run_audit;
pub use import::run_import;
pub use list::run_list;
pub use promote::run_promote;
pub use ratings::run_ratings;
pub use resolve::{run_check, run_resolve};

use anyhow::Result;
use headshot_core::config::ResolverConfig;
use headshot_core::fetch::{CurlFetcher, FetchOptions, HostThrottle, ThrottledFetcher};
use headshot_core::players::PlayerDb;
use headshot_core::PhotoResolver;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub async fn open_db(path: Option<&Path>) -> Result<PlayerDb> {
    match path {
        Some(p) => PlayerDb::open_at(p).await,
        None => PlayerDb::open_default().await,
    }
}

/// Resolver for batch commands: every worker shares one per-host throttle.
pub(crate) fn batch_resolver(cfg: &ResolverConfig) -> Result<Arc<PhotoResolver>> {
    let throttle = Arc::new(HostThrottle::new(Duration::from_millis(cfg.per_host_delay_ms)));
    let fetcher = ThrottledFetcher::new(CurlFetcher::new(FetchOptions::from_config(cfg)), throttle);
    Ok(Arc::new(PhotoResolver::new(cfg, Arc::new(fetcher))?))
}
