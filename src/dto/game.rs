use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{phase::VisiblePhase, tasks::TaskSummary, validation::validate_employee_id},
    state::game::{GameState, User},
};

#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Public projection of a player exposed to REST/SSE clients.
///
/// Everything but the password crosses the wire; secrecy of the mom link
/// is a courtesy between players, not a server guarantee.
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub employee_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mom_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guessed_mom_id: Option<Uuid>,
    pub score: u32,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            employee_id: user.employee_id.clone(),
            child_id: user.child_id,
            mom_id: user.mom_id,
            guessed_mom_id: user.guessed_mom_id,
            score: user.score,
        }
    }
}

/// Full game snapshot returned by the `/game` route.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub status: VisiblePhase,
    pub users: Vec<UserSummary>,
    pub tasks: Vec<TaskSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_game_message: Option<String>,
    /// Whether the backend is currently running without storage.
    pub degraded: bool,
}

impl GameSnapshot {
    /// Project the engine aggregate for wire consumption.
    pub fn from_game(game: &GameState, degraded: bool) -> Self {
        Self {
            status: VisiblePhase::from(&game.status),
            users: game.users.values().map(UserSummary::from).collect(),
            tasks: game.tasks.values().map(TaskSummary::from).collect(),
            end_game_message: game.end_game_message.clone(),
            degraded,
        }
    }
}

/// Payload closing the round.
#[derive(Debug, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct EndGameRequest {
    /// Farewell shown to every player; a blank value falls back to the
    /// stock message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Payload carrying a player's one-shot mom guess.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GuessRequest {
    /// Handle of the guessing player.
    #[validate(custom(function = validate_employee_id))]
    pub employee_id: String,
    /// Player the guesser believes is their mom.
    pub guessed_mom_id: Uuid,
}

/// Outcome of a recorded (or replayed) guess.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuessResponse {
    /// Guess that is now on record for the player.
    pub guessed_mom_id: Uuid,
    /// Whether the recorded guess matches the actual mom.
    pub correct: bool,
}
