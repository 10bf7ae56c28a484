use crate::services::errors::match_service_errors::MatchServiceError;
use crate::services::errors::player_service_errors::PlayerServiceError;

#[derive(Debug)]
pub enum RankingServiceError {
    Players(PlayerServiceError),
    Matches(MatchServiceError),
}

impl std::fmt::Display for RankingServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingServiceError::Players(err) => write!(f, "Player ranking failed: {}", err),
            RankingServiceError::Matches(err) => write!(f, "Match ranking failed: {}", err),
        }
    }
}

impl std::error::Error for RankingServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RankingServiceError::Players(err) => Some(err),
            RankingServiceError::Matches(err) => Some(err),
        }
    }
}

impl From<PlayerServiceError> for RankingServiceError {
    fn from(err: PlayerServiceError) -> Self {
        RankingServiceError::Players(err)
    }
}

impl From<MatchServiceError> for RankingServiceError {
    fn from(err: MatchServiceError) -> Self {
        RankingServiceError::Matches(err)
    }
}
