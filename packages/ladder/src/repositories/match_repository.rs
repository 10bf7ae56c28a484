use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Row, Sqlite, Transaction};

use crate::models::game_match::{Match, Outcome, Resolution};
use crate::models::standing::Standing;
use crate::rating;
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;
use crate::repositories::player_repository::player_from_row;

#[cfg(test)]
use mockall::automock;

pub struct SqliteMatchRepository {
    pool: SqlitePool,
}

impl SqliteMatchRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Inserts an unresolved match and returns its identifier.
    async fn create_match(
        &self,
        first_login: &str,
        second_login: &str,
        created_at: DateTime<Utc>,
        tournament_id: Option<i64>,
    ) -> Result<i64, MatchRepositoryError>;

    async fn get_match(&self, id: i64) -> Result<Option<Match>, MatchRepositoryError>;

    async fn matches_for_player(&self, login: &str) -> Result<Vec<Match>, MatchRepositoryError>;

    /// Records `outcome` and moves both ratings in one transaction.
    async fn resolve_outcome(
        &self,
        id: i64,
        outcome: Outcome,
    ) -> Result<Resolution, MatchRepositoryError>;

    async fn matches_played_ranking(&self) -> Result<Vec<Standing>, MatchRepositoryError>;

    async fn matches_won_ranking(&self) -> Result<Vec<Standing>, MatchRepositoryError>;
}

/// Builds a match query from the shared projection and a static tail.
macro_rules! match_query {
    ($tail:literal) => {
        concat!(
            "SELECT m.id, m.created_at, m.winner, m.remaining_pieces, m.tournament_id,
                f.login AS f_login, f.email AS f_email, f.credential AS f_credential, f.rating AS f_rating,
                s.login AS s_login, s.email AS s_email, s.credential AS s_credential, s.rating AS s_rating
             FROM matches m
             JOIN players f ON f.login = m.first_player
             JOIN players s ON s.login = m.second_player ",
            $tail
        )
    };
}

fn match_from_row(row: &SqliteRow) -> Result<Match, sqlx::Error> {
    let first_player = player_from_row(row, "f_")?;
    let second_player = player_from_row(row, "s_")?;
    let winner: Option<String> = row.try_get("winner")?;
    let remaining_pieces: Option<i64> = row.try_get("remaining_pieces")?;

    let outcome = match (winner, remaining_pieces) {
        (Some(winner), Some(pieces)) => Some(Outcome {
            first_player_won: winner == first_player.login(),
            remaining_pieces: u32::try_from(pieces)
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        }),
        _ => None,
    };

    Ok(Match {
        id: row.try_get("id")?,
        created_at: row.try_get("created_at")?,
        first_player,
        second_player,
        outcome,
        tournament_id: row.try_get("tournament_id")?,
    })
}

fn standing_from_row(row: &SqliteRow) -> Result<Standing, sqlx::Error> {
    let count: i64 = row.try_get("total")?;
    Ok(Standing {
        player: player_from_row(row, "")?,
        count: u32::try_from(count).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
    })
}

async fn rating_of(
    tx: &mut Transaction<'_, Sqlite>,
    login: &str,
) -> Result<f64, MatchRepositoryError> {
    let row = sqlx::query("SELECT rating FROM players WHERE login = ?")
        .bind(login)
        .fetch_optional(&mut **tx)
        .await?;
    match row {
        Some(row) => Ok(row.try_get("rating")?),
        None => Err(MatchRepositoryError::MissingPlayer(login.to_string())),
    }
}

async fn set_rating(
    tx: &mut Transaction<'_, Sqlite>,
    login: &str,
    rating: f64,
) -> Result<(), MatchRepositoryError> {
    sqlx::query("UPDATE players SET rating = ? WHERE login = ?")
        .bind(rating)
        .bind(login)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[async_trait]
impl MatchRepository for SqliteMatchRepository {
    async fn create_match(
        &self,
        first_login: &str,
        second_login: &str,
        created_at: DateTime<Utc>,
        tournament_id: Option<i64>,
    ) -> Result<i64, MatchRepositoryError> {
        let result = sqlx::query(
            "INSERT INTO matches (created_at, first_player, second_player, tournament_id) VALUES (?, ?, ?, ?)",
        )
        .bind(created_at)
        .bind(first_login)
        .bind(second_login)
        .bind(tournament_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return MatchRepositoryError::MissingPlayer(format!(
                        "{} / {}",
                        first_login, second_login
                    ));
                }
            }
            MatchRepositoryError::from(e)
        })?;
        Ok(result.last_insert_rowid())
    }

    async fn get_match(&self, id: i64) -> Result<Option<Match>, MatchRepositoryError> {
        let row = sqlx::query(match_query!("WHERE m.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| match_from_row(&row)).transpose()?)
    }

    async fn matches_for_player(&self, login: &str) -> Result<Vec<Match>, MatchRepositoryError> {
        let rows = sqlx::query(match_query!(
            "WHERE m.first_player = ? OR m.second_player = ? ORDER BY m.id ASC"
        ))
        .bind(login)
        .bind(login)
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| match_from_row(row).map_err(MatchRepositoryError::from))
            .collect()
    }

    async fn resolve_outcome(
        &self,
        id: i64,
        outcome: Outcome,
    ) -> Result<Resolution, MatchRepositoryError> {
        // Rolled back on drop unless committed below.
        let mut tx = self.pool.begin().await?;

        // Claiming the match first takes the write lock and rejects a second resolution.
        let claimed = sqlx::query(
            "UPDATE matches SET
                winner = CASE WHEN ? THEN first_player ELSE second_player END,
                loser = CASE WHEN ? THEN second_player ELSE first_player END,
                remaining_pieces = ?
             WHERE id = ? AND winner IS NULL
             RETURNING winner, loser",
        )
        .bind(outcome.first_player_won)
        .bind(outcome.first_player_won)
        .bind(i64::from(outcome.remaining_pieces))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let (winner, loser): (String, String) = match claimed {
            Some(row) => (row.try_get("winner")?, row.try_get("loser")?),
            None => {
                let exists = sqlx::query("SELECT 1 FROM matches WHERE id = ?")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .is_some();
                return Err(if exists {
                    MatchRepositoryError::AlreadyResolved
                } else {
                    MatchRepositoryError::NotFound
                });
            }
        };

        let winner_before = rating_of(&mut tx, &winner).await?;
        let loser_before = rating_of(&mut tx, &loser).await?;
        let delta = rating::compute_deltas(winner_before, loser_before);
        let winner_rating = winner_before + delta.winner;
        let loser_rating = loser_before + delta.loser;
        if !winner_rating.is_finite() || !loser_rating.is_finite() {
            return Err(MatchRepositoryError::InvalidRating(format!(
                "{} -> {}, {} -> {}",
                winner_before, winner_rating, loser_before, loser_rating
            )));
        }

        set_rating(&mut tx, &winner, winner_rating).await?;
        set_rating(&mut tx, &loser, loser_rating).await?;
        tx.commit().await?;

        Ok(Resolution {
            winner_rating,
            loser_rating,
            delta,
        })
    }

    async fn matches_played_ranking(&self) -> Result<Vec<Standing>, MatchRepositoryError> {
        let rows = sqlx::query(
            "SELECT p.login, p.email, p.credential, p.rating, COUNT(m.id) AS total
             FROM players p
             LEFT JOIN matches m ON m.first_player = p.login OR m.second_player = p.login
             GROUP BY p.login
             ORDER BY total DESC, p.login ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| standing_from_row(row).map_err(MatchRepositoryError::from))
            .collect()
    }

    async fn matches_won_ranking(&self) -> Result<Vec<Standing>, MatchRepositoryError> {
        let rows = sqlx::query(
            "SELECT p.login, p.email, p.credential, p.rating, COUNT(m.id) AS total
             FROM players p
             LEFT JOIN matches m ON m.winner = p.login
             GROUP BY p.login
             ORDER BY total DESC, p.login ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| standing_from_row(row).map_err(MatchRepositoryError::from))
            .collect()
    }
}
