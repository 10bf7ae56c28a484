use crate::repositories::errors::match_repository_errors::MatchRepositoryError;

#[derive(Debug)]
pub enum MatchServiceError {
    SameOpponent,
    AlreadyResolved,
    MatchNotFound,
    ValidationError(String),
    StorageError(String),
}

impl std::fmt::Display for MatchServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchServiceError::SameOpponent => write!(f, "A player cannot face themselves"),
            MatchServiceError::AlreadyResolved => write!(f, "Match outcome already recorded"),
            MatchServiceError::MatchNotFound => write!(f, "Match not found"),
            MatchServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            MatchServiceError::StorageError(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for MatchServiceError {}

impl From<MatchRepositoryError> for MatchServiceError {
    fn from(err: MatchRepositoryError) -> Self {
        match err {
            MatchRepositoryError::AlreadyResolved => MatchServiceError::AlreadyResolved,
            MatchRepositoryError::NotFound => MatchServiceError::MatchNotFound,
            MatchRepositoryError::MissingPlayer(_)
            | MatchRepositoryError::InvalidRating(_)
            | MatchRepositoryError::Database(_) => MatchServiceError::StorageError(err.to_string()),
        }
    }
}
