//! SQLite-backed player database: connection, migrations, row mapping.

use anyhow::Result;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::types::PlayerRecord;

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the player database.
///
/// The default file lives under the XDG state directory:
/// `~/.local/state/headshot/players.db`.
#[derive(Clone)]
pub struct PlayerDb {
    pub(crate) pool: Pool<Sqlite>,
}

impl PlayerDb {
    /// Open (or create) the default player database and run migrations.
    pub async fn open_default() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("headshot")?;
        let state_dir = xdg_dirs.get_state_home().join("headshot");
        Self::open_at(state_dir.join("players.db")).await
    }

    /// Open (or create) the database at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect(&uri)
            .await?;
        let db = PlayerDb { pool };
        db.migrate().await?;
        tracing::debug!("player db open at {}", path.display());
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        // `UNIQUE(name, sport)` makes re-importing a roster idempotent.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS players (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                sport TEXT NOT NULL,
                team TEXT,
                position TEXT,
                college TEXT,
                image_url TEXT,
                tier INTEGER,
                rating INTEGER,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                UNIQUE(name, sport)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

pub(crate) const PLAYER_COLUMNS: &str =
    "id, name, sport, team, position, college, image_url, tier, rating, created_at, updated_at";

pub(crate) fn record_from_row(row: &SqliteRow) -> Result<PlayerRecord> {
    let sport: String = row.get("sport");
    Ok(PlayerRecord {
        id: row.get("id"),
        name: row.get("name"),
        sport: sport.parse()?,
        team: row.get("team"),
        position: row.get("position"),
        college: row.get("college"),
        image_url: row.get("image_url"),
        tier: row.get("tier"),
        rating: row.get("rating"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Current time as Unix seconds (for DB timestamps).
pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
/// Open an in-memory database for tests (no disk I/O).
pub(crate) async fn open_memory() -> Result<PlayerDb> {
    // Single connection to avoid in-memory pool handing back a different empty DB.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    let db = PlayerDb { pool };
    db.migrate().await?;
    Ok(db)
}
