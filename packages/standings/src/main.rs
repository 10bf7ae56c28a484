use std::io::Write;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ladder::db;
use ladder::db::SqlitePool;
use ladder::repositories::match_repository::SqliteMatchRepository;
use ladder::repositories::player_repository::SqlitePlayerRepository;
use ladder::services::match_service::MatchService;
use ladder::services::player_service::PlayerService;
use ladder::services::ranking_service::RankingService;
use ladder::DatabaseConfig;

#[derive(Serialize)]
struct Report<'a, T: Serialize> {
    ranking: &'a str,
    entries: T,
}

fn write_report<W: Write, T: Serialize>(
    out: &mut W,
    ranking: &str,
    entries: T,
) -> Result<(), Box<dyn std::error::Error>> {
    serde_json::to_writer(&mut *out, &Report { ranking, entries })?;
    writeln!(out)?;
    Ok(())
}

/// One JSON line per ranking: rating, matches played, matches won.
async fn write_standings<W: Write>(
    rankings: &RankingService,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    write_report(out, "rating", rankings.by_rating().await?)?;
    write_report(out, "matches_played", rankings.by_matches_played().await?)?;
    write_report(out, "matches_won", rankings.by_matches_won().await?)?;
    Ok(())
}

fn ranking_service(pool: SqlitePool) -> RankingService {
    let players = PlayerService::new(Arc::new(SqlitePlayerRepository::new(pool.clone())));
    let matches = MatchService::new(Arc::new(SqliteMatchRepository::new(pool)));
    RankingService::new(players, matches)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = DatabaseConfig::from_env()?;
    let pool = db::connect(&config).await?;

    let rankings = ranking_service(pool);

    write_standings(&rankings, &mut std::io::stdout().lock()).await?;

    info!("Standings written");
    Ok(())
}
