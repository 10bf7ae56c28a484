//! Player registry, match ledger and Elo ratings for a two-player board game ladder.

pub mod config;
pub mod credential;
pub mod db;
pub mod models;
pub mod rating;
pub mod repositories;
pub mod services;

pub use config::DatabaseConfig;
pub use models::game_match::{Match, MatchSummary, Outcome, Resolution};
pub use models::player::Player;
pub use models::standing::Standing;
pub use services::match_service::MatchService;
pub use services::player_service::PlayerService;
pub use services::ranking_service::RankingService;
