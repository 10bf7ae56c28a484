use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::models::game_match::{Match, Outcome, Resolution};
use crate::models::player::Player;
use crate::models::standing::Standing;
use crate::repositories::match_repository::MatchRepository;
use crate::services::errors::match_service_errors::MatchServiceError;

#[derive(Clone)]
pub struct MatchService {
    repository: Arc<dyn MatchRepository + Send + Sync>,
}

impl MatchService {
    pub fn new(repository: Arc<dyn MatchRepository + Send + Sync>) -> Self {
        MatchService { repository }
    }

    pub async fn create(
        &self,
        first_player: &Player,
        second_player: &Player,
    ) -> Result<Match, MatchServiceError> {
        self.insert(first_player, second_player, None).await
    }

    pub async fn create_for_tournament(
        &self,
        first_player: &Player,
        second_player: &Player,
        tournament_id: i64,
    ) -> Result<Match, MatchServiceError> {
        self.insert(first_player, second_player, Some(tournament_id))
            .await
    }

    async fn insert(
        &self,
        first_player: &Player,
        second_player: &Player,
        tournament_id: Option<i64>,
    ) -> Result<Match, MatchServiceError> {
        if first_player == second_player {
            warn!("Rejected match of {} against themselves", first_player.login());
            return Err(MatchServiceError::SameOpponent);
        }

        let created_at = Utc::now();
        let id = self
            .repository
            .create_match(
                first_player.login(),
                second_player.login(),
                created_at,
                tournament_id,
            )
            .await?;

        info!(
            "Created match {} between {} and {}",
            id,
            first_player.login(),
            second_player.login()
        );
        Ok(Match {
            id,
            created_at,
            first_player: first_player.clone(),
            second_player: second_player.clone(),
            outcome: None,
            tournament_id,
        })
    }

    pub async fn load(&self, id: i64) -> Result<Option<Match>, MatchServiceError> {
        Ok(self.repository.get_match(id).await?)
    }

    /// Every match `login` took part in, oldest first.
    pub async fn history(&self, login: &str) -> Result<Vec<Match>, MatchServiceError> {
        Ok(self.repository.matches_for_player(login).await?)
    }

    /// Records the winner and moves both ratings in one atomic step.
    ///
    /// On success `game` carries the outcome and both players' new ratings. On failure
    /// neither the store nor `game` changes.
    pub async fn resolve_outcome(
        &self,
        game: &mut Match,
        first_player_won: bool,
        remaining_pieces: i32,
    ) -> Result<Resolution, MatchServiceError> {
        let remaining_pieces = u32::try_from(remaining_pieces).map_err(|_| {
            MatchServiceError::ValidationError(format!(
                "Remaining pieces cannot be negative: {}",
                remaining_pieces
            ))
        })?;
        if game.is_resolved() {
            warn!("Match {} is already resolved", game.id);
            return Err(MatchServiceError::AlreadyResolved);
        }

        let outcome = Outcome {
            first_player_won,
            remaining_pieces,
        };
        let resolution = self.repository.resolve_outcome(game.id, outcome).await?;

        game.outcome = Some(outcome);
        let (winner, loser) = if first_player_won {
            (&mut game.first_player, &mut game.second_player)
        } else {
            (&mut game.second_player, &mut game.first_player)
        };
        winner.set_rating(resolution.winner_rating);
        loser.set_rating(resolution.loser_rating);

        info!(
            "Match {} won by {} ({:+.2}), {} now {:.2}",
            game.id,
            winner.login(),
            resolution.delta.winner,
            loser.login(),
            resolution.loser_rating
        );
        Ok(resolution)
    }

    /// Matches played per player, as either opponent, most first.
    pub async fn matches_played_ranking(&self) -> Result<Vec<Standing>, MatchServiceError> {
        Ok(self.repository.matches_played_ranking().await?)
    }

    /// Matches won per player, most first.
    pub async fn matches_won_ranking(&self) -> Result<Vec<Standing>, MatchServiceError> {
        Ok(self.repository.matches_won_ranking().await?)
    }
}
