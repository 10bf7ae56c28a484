use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::player::Player;
use crate::rating::RatingDelta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub first_player_won: bool,
    pub remaining_pieces: u32,
}

/// Ratings both players hold once a resolution has been committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub winner_rating: f64,
    pub loser_rating: f64,
    pub delta: RatingDelta,
}

/// A match between two distinct players, unresolved until its outcome is recorded.
///
/// Only the match service creates or resolves matches; outside the crate a match is
/// read-only.
///
/// ```compile_fail
/// fn reopen(game: &mut ladder::Match) {
///     game.outcome = None;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Match {
    pub(crate) id: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) first_player: Player,
    pub(crate) second_player: Player,
    pub(crate) outcome: Option<Outcome>,
    pub(crate) tournament_id: Option<i64>,
}

/// Boundary view of a match, players named by login.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub first_player: String,
    pub second_player: String,
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub remaining_pieces: Option<u32>,
    pub tournament_id: Option<i64>,
}

impl Match {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn first_player(&self) -> &Player {
        &self.first_player
    }

    pub fn second_player(&self) -> &Player {
        &self.second_player
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn tournament_id(&self) -> Option<i64> {
        self.tournament_id
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn winner(&self) -> Option<&Player> {
        self.outcome.map(|o| {
            if o.first_player_won {
                &self.first_player
            } else {
                &self.second_player
            }
        })
    }

    pub fn loser(&self) -> Option<&Player> {
        self.outcome.map(|o| {
            if o.first_player_won {
                &self.second_player
            } else {
                &self.first_player
            }
        })
    }

    pub fn remaining_pieces(&self) -> Option<u32> {
        self.outcome.map(|o| o.remaining_pieces)
    }

    pub fn involves(&self, login: &str) -> bool {
        self.first_player.login() == login || self.second_player.login() == login
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            id: self.id,
            created_at: self.created_at,
            first_player: self.first_player.login().to_string(),
            second_player: self.second_player.login().to_string(),
            winner: self.winner().map(|p| p.login().to_string()),
            loser: self.loser().map(|p| p.login().to_string()),
            remaining_pieces: self.remaining_pieces(),
            tournament_id: self.tournament_id,
        }
    }
}
