//! Player queries.

use anyhow::Result;
use sqlx::Row;

use super::db::{record_from_row, PlayerDb, PLAYER_COLUMNS};
use super::types::PlayerRecord;
use crate::hints::Sport;

impl PlayerDb {
    /// Exact-name lookup within one sport.
    pub async fn find_by_name(&self, name: &str, sport: Sport) -> Result<Option<PlayerRecord>> {
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE name = ?1 AND sport = ?2");
        let row = sqlx::query(&sql)
            .bind(name)
            .bind(sport.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    /// All players, optionally restricted to one sport, ordered by name.
    pub async fn list_players(&self, sport: Option<Sport>) -> Result<Vec<PlayerRecord>> {
        let rows = match sport {
            Some(sport) => {
                let sql = format!(
                    "SELECT {PLAYER_COLUMNS} FROM players WHERE sport = ?1 ORDER BY name ASC, id ASC"
                );
                sqlx::query(&sql)
                    .bind(sport.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql =
                    format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY sport ASC, name ASC, id ASC");
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
        };
        rows.iter().map(record_from_row).collect()
    }

    /// Player count per tier for one sport (untiered rows are omitted).
    pub async fn tier_counts(&self, sport: Sport) -> Result<Vec<(i64, i64)>> {
        let rows = sqlx::query(
            r#"
            SELECT tier, COUNT(*) AS n
            FROM players
            WHERE sport = ?1 AND tier IS NOT NULL
            GROUP BY tier
            ORDER BY tier ASC
            "#,
        )
        .bind(sport.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(|row| (row.get::<i64, _>("tier"), row.get::<i64, _>("n")))
            .collect())
    }
}
