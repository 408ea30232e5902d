//! Local player store (SQLite via sqlx).
//!
//! One row per `(name, sport)`: roster metadata plus the resolved headshot
//! URL and difficulty tier.

pub mod db;
mod read;
pub mod types;
mod write;

pub use db::PlayerDb;
pub use types::*;
