#[derive(Debug)]
pub enum MatchRepositoryError {
    NotFound,
    AlreadyResolved,
    MissingPlayer(String),
    InvalidRating(String),
    Database(String),
}

impl std::fmt::Display for MatchRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchRepositoryError::NotFound => write!(f, "Match not found"),
            MatchRepositoryError::AlreadyResolved => write!(f, "Match already resolved"),
            MatchRepositoryError::MissingPlayer(login) => {
                write!(f, "Match references unknown player: {}", login)
            }
            MatchRepositoryError::InvalidRating(msg) => write!(f, "Invalid rating: {}", msg),
            MatchRepositoryError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for MatchRepositoryError {}

impl From<sqlx::Error> for MatchRepositoryError {
    fn from(err: sqlx::Error) -> Self {
        MatchRepositoryError::Database(err.to_string())
    }
}
