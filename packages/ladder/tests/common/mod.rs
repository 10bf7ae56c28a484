#![allow(dead_code)]

use std::sync::Arc;

use ladder::db;
use ladder::repositories::match_repository::SqliteMatchRepository;
use ladder::repositories::player_repository::SqlitePlayerRepository;
use ladder::{DatabaseConfig, MatchService, Player, PlayerService, RankingService};
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

pub struct Ladder {
    pub pool: SqlitePool,
    pub players: PlayerService,
    pub matches: MatchService,
    pub rankings: RankingService,
}

/// Fresh in-memory store with the schema applied.
pub async fn setup() -> anyhow::Result<Ladder> {
    setup_with(&DatabaseConfig::in_memory()).await
}

/// File-backed store in WAL mode with a pool of `max_connections`.
pub async fn setup_file(dir: &TempDir, max_connections: u32) -> anyhow::Result<Ladder> {
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("ladder.db").display());
    setup_with(&DatabaseConfig::new(url, max_connections)).await
}

pub async fn setup_with(config: &DatabaseConfig) -> anyhow::Result<Ladder> {
    let pool = db::connect(config).await?;
    let players = PlayerService::new(Arc::new(SqlitePlayerRepository::new(pool.clone())));
    let matches = MatchService::new(Arc::new(SqliteMatchRepository::new(pool.clone())));
    let rankings = RankingService::new(players.clone(), matches.clone());
    Ok(Ladder {
        pool,
        players,
        matches,
        rankings,
    })
}

pub fn random_secret() -> String {
    Uuid::new_v4().to_string()
}

pub async fn register(ladder: &Ladder, login: &str) -> anyhow::Result<Player> {
    let email = format!("{}@univ-valenciennes.fr", login);
    Ok(ladder
        .players
        .register(login, &random_secret(), &email)
        .await?)
}

pub async fn stored_rating(ladder: &Ladder, login: &str) -> anyhow::Result<f64> {
    let player = ladder
        .players
        .load(login)
        .await?
        .ok_or_else(|| anyhow::anyhow!("player {} missing", login))?;
    Ok(player.rating())
}
