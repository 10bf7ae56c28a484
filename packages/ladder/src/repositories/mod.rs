pub mod errors;
pub mod match_repository;
pub mod player_repository;
