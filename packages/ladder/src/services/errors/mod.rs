pub mod match_service_errors;
pub mod player_service_errors;
pub mod ranking_service_errors;
