//! Player writes: insert, upsert, photo, tier and rating updates.

use anyhow::Result;
use sqlx::Row;

use super::db::{unix_timestamp, PlayerDb};
use super::types::{NewPlayer, PlayerId};
use crate::hints::Sport;

impl PlayerDb {
    /// Insert a new row. Returns `None` (and changes nothing) when a player
    /// with the same name and sport already exists.
    pub async fn insert_player(&self, player: &NewPlayer) -> Result<Option<PlayerId>> {
        let now = unix_timestamp();
        let result = sqlx::query(
            r#"
            INSERT INTO players (
                name, sport, team, position, college,
                image_url, tier, rating, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(name, sport) DO NOTHING
            "#,
        )
        .bind(player.name.as_str())
        .bind(player.sport.as_str())
        .bind(player.team.as_deref())
        .bind(player.position.as_deref())
        .bind(player.college.as_deref())
        .bind(player.image_url.as_deref())
        .bind(player.tier)
        .bind(player.rating)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(result.last_insert_rowid()))
    }

    /// Insert, or merge into the existing `(name, sport)` row. Fields the
    /// entry leaves unset keep their stored values.
    pub async fn upsert_player(&self, player: &NewPlayer) -> Result<PlayerId> {
        let now = unix_timestamp();
        let row = sqlx::query(
            r#"
            INSERT INTO players (
                name, sport, team, position, college,
                image_url, tier, rating, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(name, sport) DO UPDATE SET
                team = COALESCE(excluded.team, players.team),
                position = COALESCE(excluded.position, players.position),
                college = COALESCE(excluded.college, players.college),
                image_url = COALESCE(excluded.image_url, players.image_url),
                tier = COALESCE(excluded.tier, players.tier),
                rating = COALESCE(excluded.rating, players.rating),
                updated_at = excluded.updated_at
            RETURNING id
            "#,
        )
        .bind(player.name.as_str())
        .bind(player.sport.as_str())
        .bind(player.team.as_deref())
        .bind(player.position.as_deref())
        .bind(player.college.as_deref())
        .bind(player.image_url.as_deref())
        .bind(player.tier)
        .bind(player.rating)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    /// Replace a player's photo URL (`None` clears it).
    pub async fn set_image_url(&self, id: PlayerId, image_url: Option<&str>) -> Result<()> {
        let now = unix_timestamp();
        sqlx::query(
            r#"
            UPDATE players
            SET image_url = ?1,
                updated_at = ?2
            WHERE id = ?3
            "#,
        )
        .bind(image_url)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Set the tier of `(name, sport)`. Returns false when no such player exists.
    pub async fn set_tier(&self, name: &str, sport: Sport, tier: i64) -> Result<bool> {
        let now = unix_timestamp();
        let result = sqlx::query(
            r#"
            UPDATE players
            SET tier = ?1,
                updated_at = ?2
            WHERE name = ?3 AND sport = ?4
            "#,
        )
        .bind(tier)
        .bind(now)
        .bind(name)
        .bind(sport.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Set the rating of `(name, sport)`. Returns false when no such player exists.
    pub async fn set_rating(&self, name: &str, sport: Sport, rating: i64) -> Result<bool> {
        let now = unix_timestamp();
        let result = sqlx::query(
            r#"
            UPDATE players
            SET rating = ?1,
                updated_at = ?2
            WHERE name = ?3 AND sport = ?4
            "#,
        )
        .bind(rating)
        .bind(now)
        .bind(name)
        .bind(sport.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
