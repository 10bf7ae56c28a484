use serde::Serialize;

use crate::models::player::Player;

/// One row of a count-based ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub player: Player,
    pub count: u32,
}
