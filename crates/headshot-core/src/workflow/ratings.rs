//! Rating refresh from a scraped statistics table.
//!
//! The table is located by element id and its cells by `data-stat`
//! attribute, the layout the sports-reference family of sites uses (e.g. the
//! approximate-value table at `/years/<year>/approxval.htm`).

use anyhow::{anyhow, bail, Context, Result};
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;

use crate::fetch::{FetchResponse, Fetcher};
use crate::hints::Sport;
use crate::players::PlayerDb;

/// Where to scrape ratings from and which rows count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingsOptions {
    pub url: String,
    /// Players whose stored rating is updated.
    pub sport: Sport,
    /// `id` attribute of the stats `<table>`.
    pub table_id: String,
    /// `data-stat` of the cell holding the player name.
    pub name_stat: String,
    /// `data-stat` of the cell holding the integer rating.
    pub value_stat: String,
    /// Rows rated below this are ignored.
    pub min_value: i64,
}

impl Default for RatingsOptions {
    fn default() -> Self {
        Self {
            url: "https://www.pro-football-reference.com/years/2023/approxval.htm".to_string(),
            sport: Sport::Football,
            table_id: "av".to_string(),
            name_stat: "player".to_string(),
            value_stat: "av".to_string(),
            min_value: 4,
        }
    }
}

/// One parsed table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingsReport {
    /// Rows with a name and an integer value.
    pub scraped: usize,
    /// Rows at or above the threshold.
    pub qualified: usize,
    pub updated: usize,
    /// Qualified names with no stored player.
    pub not_stored: Vec<String>,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {css:?}: {e}"))
}

fn cell_text(row: &ElementRef<'_>, cell: &Selector) -> Option<String> {
    row.select(cell)
        .next()
        .map(|c| c.text().collect::<String>().trim().to_string())
}

/// Display name without the site's honor markers ("Tom Brady*+").
fn clean_name(raw: &str) -> String {
    raw.replace(['*', '+'], "").trim().to_string()
}

/// Parse every body row of the stats table. Repeated header rows and rows
/// whose value is not an integer are skipped.
pub fn parse_stat_table(html: &str, opts: &RatingsOptions) -> Result<Vec<StatRow>> {
    let document = Html::parse_document(html);
    let table_sel = selector(&format!("table[id=\"{}\"]", opts.table_id))?;
    let row_sel = selector("tbody > tr")?;
    let name_sel = selector(&format!("td[data-stat=\"{}\"]", opts.name_stat))?;
    let value_sel = selector(&format!("td[data-stat=\"{}\"]", opts.value_stat))?;

    let Some(table) = document.select(&table_sel).next() else {
        bail!("no table with id {:?}", opts.table_id);
    };

    let mut rows = Vec::new();
    for row in table.select(&row_sel) {
        if row.value().classes().any(|c| c == "thead") {
            continue;
        }
        let (Some(name), Some(value)) = (cell_text(&row, &name_sel), cell_text(&row, &value_sel))
        else {
            continue;
        };
        let Ok(value) = value.parse::<i64>() else {
            continue;
        };
        let name = clean_name(&name);
        if !name.is_empty() {
            rows.push(StatRow { name, value });
        }
    }
    Ok(rows)
}

async fn fetch_blocking(fetcher: Arc<dyn Fetcher>, url: String) -> Result<FetchResponse> {
    let response = tokio::task::spawn_blocking(move || fetcher.get(&url))
        .await
        .map_err(|e| anyhow!("fetch task join: {}", e))?;
    Ok(response?)
}

/// Fetch the stats page, keep rows rated at least `min_value`, and store each
/// rating on the player with that exact name.
pub async fn update_ratings(
    db: &PlayerDb,
    fetcher: Arc<dyn Fetcher>,
    opts: &RatingsOptions,
) -> Result<RatingsReport> {
    let response = fetch_blocking(fetcher, opts.url.clone())
        .await
        .with_context(|| format!("fetch {}", opts.url))?;
    if !response.is_success() {
        bail!("{} answered HTTP {}", opts.url, response.status);
    }
    let rows = parse_stat_table(&response.text(), opts)?;
    tracing::info!(url = %opts.url, rows = rows.len(), "parsed stats table");

    let mut report = RatingsReport {
        scraped: rows.len(),
        ..RatingsReport::default()
    };
    for row in rows.into_iter().filter(|r| r.value >= opts.min_value) {
        report.qualified += 1;
        if db.set_rating(&row.name, opts.sport, row.value).await? {
            tracing::debug!(name = %row.name, rating = row.value, "rating updated");
            report.updated += 1;
        } else {
            report.not_stored.push(row.name);
        }
    }
    Ok(report)
}
