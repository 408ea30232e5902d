//! `headshot list` – show stored players.

use anyhow::Result;
use headshot_core::players::PlayerDb;
use headshot_core::Sport;

pub async fn run_list(db: &PlayerDb, sport: Option<Sport>) -> Result<()> {
    let players = db.list_players(sport).await?;
    if players.is_empty() {
        println!("No players in database.");
        return Ok(());
    }
    println!("{:<6} {:<28} {:<11} {:<5} {}", "ID", "NAME", "SPORT", "TIER", "PHOTO");
    for p in players {
        let tier = p.tier.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string());
        let photo = if p.lacks_photo() {
            "-".to_string()
        } else {
            p.image_url.clone().unwrap_or_default()
        };
        println!("{:<6} {:<28} {:<11} {:<5} {}", p.id, p.name, p.sport.as_str(), tier, photo);
    }
    Ok(())
}
