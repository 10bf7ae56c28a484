use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use crate::credential::Credential;
use crate::models::player::Player;
use crate::repositories::errors::player_repository_errors::PlayerRepositoryError;

#[cfg(test)]
use mockall::automock;

pub struct SqlitePlayerRepository {
    pool: SqlitePool,
}

impl SqlitePlayerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn create_player(&self, player: &Player) -> Result<(), PlayerRepositoryError>;
    async fn get_player(&self, login: &str) -> Result<Option<Player>, PlayerRepositoryError>;
    async fn get_player_by_email(&self, email: &str)
        -> Result<Option<Player>, PlayerRepositoryError>;
    async fn list_by_rating(&self) -> Result<Vec<Player>, PlayerRepositoryError>;
    async fn update_player(&self, player: &Player) -> Result<(), PlayerRepositoryError>;
    async fn login_exists(&self, login: &str) -> Result<bool, PlayerRepositoryError>;
    /// Login of the player currently holding `email`, if any.
    async fn email_owner(&self, email: &str) -> Result<Option<String>, PlayerRepositoryError>;
}

/// Maps the columns `{prefix}login`, `{prefix}email`, `{prefix}credential` and
/// `{prefix}rating` of `row` to a player.
pub(crate) fn player_from_row(row: &SqliteRow, prefix: &str) -> Result<Player, sqlx::Error> {
    let login: String = row.try_get(format!("{}login", prefix).as_str())?;
    let email: String = row.try_get(format!("{}email", prefix).as_str())?;
    let credential: String = row.try_get(format!("{}credential", prefix).as_str())?;
    let rating: f64 = row.try_get(format!("{}rating", prefix).as_str())?;
    Ok(Player::from_parts(
        login,
        email,
        Credential::from_stored(credential),
        rating,
    ))
}

#[async_trait]
impl PlayerRepository for SqlitePlayerRepository {
    async fn create_player(&self, player: &Player) -> Result<(), PlayerRepositoryError> {
        sqlx::query("INSERT INTO players (login, email, credential, rating) VALUES (?, ?, ?, ?)")
            .bind(player.login())
            .bind(player.email())
            .bind(player.credential().as_stored())
            .bind(player.rating())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_player(&self, login: &str) -> Result<Option<Player>, PlayerRepositoryError> {
        let row =
            sqlx::query("SELECT login, email, credential, rating FROM players WHERE login = ?")
                .bind(login)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|row| player_from_row(&row, "")).transpose()?)
    }

    async fn get_player_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Player>, PlayerRepositoryError> {
        let row =
            sqlx::query("SELECT login, email, credential, rating FROM players WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|row| player_from_row(&row, "")).transpose()?)
    }

    async fn list_by_rating(&self) -> Result<Vec<Player>, PlayerRepositoryError> {
        let rows = sqlx::query(
            "SELECT login, email, credential, rating FROM players ORDER BY rating DESC, login ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| player_from_row(row, "").map_err(PlayerRepositoryError::from))
            .collect()
    }

    async fn update_player(&self, player: &Player) -> Result<(), PlayerRepositoryError> {
        let result =
            sqlx::query("UPDATE players SET email = ?, credential = ?, rating = ? WHERE login = ?")
                .bind(player.email())
                .bind(player.credential().as_stored())
                .bind(player.rating())
                .bind(player.login())
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(PlayerRepositoryError::NotFound);
        }
        Ok(())
    }

    async fn login_exists(&self, login: &str) -> Result<bool, PlayerRepositoryError> {
        let row = sqlx::query("SELECT 1 FROM players WHERE login = ?")
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn email_owner(&self, email: &str) -> Result<Option<String>, PlayerRepositoryError> {
        let row = sqlx::query("SELECT login FROM players WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row
            .map(|row| row.try_get::<String, _>("login"))
            .transpose()?)
    }
}
