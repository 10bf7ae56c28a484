use tracing::debug;

use crate::models::player::Player;
use crate::models::standing::Standing;
use crate::services::errors::ranking_service_errors::RankingServiceError;
use crate::services::match_service::MatchService;
use crate::services::player_service::PlayerService;

/// Read-only views over players and matches. Every call reads the store afresh.
#[derive(Clone)]
pub struct RankingService {
    players: PlayerService,
    matches: MatchService,
}

impl RankingService {
    pub fn new(players: PlayerService, matches: MatchService) -> Self {
        RankingService { players, matches }
    }

    pub async fn by_rating(&self) -> Result<Vec<Player>, RankingServiceError> {
        let ranking = self.players.load_all_by_rating().await?;
        debug!("Rating ranking has {} players", ranking.len());
        Ok(ranking)
    }

    pub async fn by_matches_played(&self) -> Result<Vec<Standing>, RankingServiceError> {
        let ranking = self.matches.matches_played_ranking().await?;
        debug!("Matches played ranking has {} players", ranking.len());
        Ok(ranking)
    }

    pub async fn by_matches_won(&self) -> Result<Vec<Standing>, RankingServiceError> {
        let ranking = self.matches.matches_won_ranking().await?;
        debug!("Matches won ranking has {} players", ranking.len());
        Ok(ranking)
    }
}
