#[derive(Debug)]
pub enum PlayerRepositoryError {
    NotFound,
    DuplicateLogin,
    DuplicateEmail,
    Database(String),
}

impl std::fmt::Display for PlayerRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerRepositoryError::NotFound => write!(f, "Player not found"),
            PlayerRepositoryError::DuplicateLogin => write!(f, "Login already registered"),
            PlayerRepositoryError::DuplicateEmail => write!(f, "Email already registered"),
            PlayerRepositoryError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for PlayerRepositoryError {}

impl From<sqlx::Error> for PlayerRepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                // SQLite names the offending column: "UNIQUE constraint failed: players.email"
                let message = db_err.message();
                if message.contains("players.email") {
                    return PlayerRepositoryError::DuplicateEmail;
                }
                if message.contains("players.login") {
                    return PlayerRepositoryError::DuplicateLogin;
                }
            }
        }
        PlayerRepositoryError::Database(err.to_string())
    }
}
