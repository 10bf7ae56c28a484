pub mod game_match;
pub mod player;
pub mod standing;
