use serde::Serialize;
use utoipa::ToSchema;

use crate::state::game::GamePhase;

/// Publicly visible game phase exposed to clients (REST/SSE).
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisiblePhase {
    /// Players can still sign up.
    Registration,
    /// The circle has been drawn; dares are in flight.
    Paired,
    /// The round is over; guessing is open.
    Ended,
}

impl From<&GamePhase> for VisiblePhase {
    fn from(value: &GamePhase) -> Self {
        match value {
            GamePhase::Registration => VisiblePhase::Registration,
            GamePhase::Paired => VisiblePhase::Paired,
            GamePhase::Ended => VisiblePhase::Ended,
        }
    }
}
