//! CLI for the headshot resolver.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use headshot_core::config;
use headshot_core::workflow::{ExistingPolicy, MissingPhotoPolicy, RatingsOptions};
use headshot_core::{Hints, Sport};
use std::path::PathBuf;

use commands::{
    open_db, run_audit, run_check, run_import, run_list, run_promote, run_ratings, run_resolve,
};

/// Top-level CLI for the headshot resolver.
#[derive(Debug, Parser)]
#[command(name = "headshot")]
#[command(about = "Resolve, validate and store player headshot URLs", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/headshot/config.toml, created if missing).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Player database (default: ~/.local/state/headshot/players.db).
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Trace every candidate probe.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve one player's headshot URL and print it.
    Resolve {
        /// Player name, e.g. "Jim McMahon".
        name: String,
        /// football or basketball.
        #[arg(long)]
        sport: Option<Sport>,
        /// Position or role, e.g. QB.
        #[arg(long)]
        position: Option<String>,
        /// Team or college.
        #[arg(long)]
        organization: Option<String>,
        /// Give up after this many seconds overall.
        #[arg(long, value_name = "SECS")]
        deadline_secs: Option<u64>,
    },

    /// Check whether a URL currently serves a valid headshot.
    Check {
        url: String,
    },

    /// Import players from a roster TOML file, resolving photos as needed.
    Import {
        /// Roster file with [[player]] tables.
        roster: PathBuf,
        /// skip-if-exists or force-refresh.
        #[arg(long, default_value = "skip-if-exists", value_name = "POLICY")]
        existing: ExistingPolicy,
        /// What to do when no photo is found: skip or insert-null.
        #[arg(long, default_value = "skip", value_name = "POLICY")]
        missing_photo: MissingPhotoPolicy,
        /// Only import the first N roster entries.
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Re-resolve stored players whose photo is missing or broken.
    Audit {
        #[arg(long)]
        sport: Option<Sport>,
        /// Check up to N players concurrently.
        #[arg(long, default_value = "4", value_name = "N")]
        jobs: usize,
    },

    /// List stored players.
    List {
        #[arg(long)]
        sport: Option<Sport>,
    },

    /// Apply tier promotions from a TOML file.
    Promote {
        /// File with [[promotion]] tables.
        file: PathBuf,
    },

    /// Update player ratings from a stats table page.
    Ratings {
        /// Stats page (default: the 2023 approximate-value table).
        #[arg(long)]
        url: Option<String>,
        /// Sport of the players being rated.
        #[arg(long, default_value = "football")]
        sport: Sport,
        /// Ignore rows rated below this.
        #[arg(long, default_value = "4", value_name = "N")]
        min_value: i64,
        /// id of the stats table.
        #[arg(long, value_name = "ID")]
        table: Option<String>,
        /// data-stat of the name cell.
        #[arg(long, value_name = "STAT")]
        name_stat: Option<String>,
        /// data-stat of the rating cell.
        #[arg(long, value_name = "STAT")]
        value_stat: Option<String>,
        /// Timeout for the page fetch.
        #[arg(long, default_value = "30", value_name = "SECS")]
        timeout_secs: u64,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let cfg = match &self.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match self.command {
            CliCommand::Resolve {
                name,
                sport,
                position,
                organization,
                deadline_secs,
            } => {
                let hints = Hints {
                    sport,
                    position,
                    organization,
                };
                run_resolve(&cfg, name, hints, deadline_secs).await?;
            }
            CliCommand::Check { url } => run_check(&cfg, url).await?,
            CliCommand::Import {
                roster,
                existing,
                missing_photo,
                limit,
            } => {
                let db = open_db(self.db.as_deref()).await?;
                run_import(&db, &cfg, &roster, existing, missing_photo, limit).await?;
            }
            CliCommand::Audit { sport, jobs } => {
                let db = open_db(self.db.as_deref()).await?;
                run_audit(&db, &cfg, sport, jobs).await?;
            }
            CliCommand::List { sport } => {
                let db = open_db(self.db.as_deref()).await?;
                run_list(&db, sport).await?;
            }
            CliCommand::Promote { file } => {
                let db = open_db(self.db.as_deref()).await?;
                run_promote(&db, &file).await?;
            }
            CliCommand::Ratings {
                url,
                sport,
                min_value,
                table,
                name_stat,
                value_stat,
                timeout_secs,
            } => {
                let defaults = RatingsOptions::default();
                let opts = RatingsOptions {
                    url: url.unwrap_or(defaults.url),
                    sport,
                    table_id: table.unwrap_or(defaults.table_id),
                    name_stat: name_stat.unwrap_or(defaults.name_stat),
                    value_stat: value_stat.unwrap_or(defaults.value_stat),
                    min_value,
                };
                let db = open_db(self.db.as_deref()).await?;
                run_ratings(&db, &cfg, &opts, timeout_secs).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
