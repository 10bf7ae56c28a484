use crate::repositories::errors::player_repository_errors::PlayerRepositoryError;

#[derive(Debug)]
pub enum PlayerServiceError {
    InvalidLogin(String),
    InvalidEmail(String),
    DuplicateLogin,
    DuplicateEmail,
    PlayerNotFound,
    StorageError(String),
}

impl std::fmt::Display for PlayerServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerServiceError::InvalidLogin(msg) => write!(f, "Invalid login: {}", msg),
            PlayerServiceError::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
            PlayerServiceError::DuplicateLogin => write!(f, "Login already registered"),
            PlayerServiceError::DuplicateEmail => write!(f, "Email already registered"),
            PlayerServiceError::PlayerNotFound => write!(f, "Player not found"),
            PlayerServiceError::StorageError(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for PlayerServiceError {}

impl From<PlayerRepositoryError> for PlayerServiceError {
    fn from(err: PlayerRepositoryError) -> Self {
        match err {
            PlayerRepositoryError::DuplicateLogin => PlayerServiceError::DuplicateLogin,
            PlayerRepositoryError::DuplicateEmail => PlayerServiceError::DuplicateEmail,
            PlayerRepositoryError::NotFound => PlayerServiceError::PlayerNotFound,
            PlayerRepositoryError::Database(msg) => PlayerServiceError::StorageError(msg),
        }
    }
}
