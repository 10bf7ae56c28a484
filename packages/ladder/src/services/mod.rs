pub mod errors;
pub mod match_service;
pub mod player_service;
pub mod ranking_service;
