//! Elo rating calculation

/// Rating given to every newly registered player
pub const DEFAULT_RATING: f64 = 1000.0;

/// K-factor for Elo updates
pub const K_FACTOR: f64 = 32.0;

/// Rating changes produced by one resolved match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingDelta {
    pub winner: f64,
    pub loser: f64,
}

/// Expected score of a player rated `rating` against one rated `opponent`
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((opponent - rating) / 400.0))
}

/// Compute the post-match deltas. Zero-sum: `loser == -winner`.
pub fn compute_deltas(winner_rating: f64, loser_rating: f64) -> RatingDelta {
    let winner = K_FACTOR * (1.0 - expected_score(winner_rating, loser_rating));
    RatingDelta {
        winner,
        loser: -winner,
    }
}
