use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::game::{GameSnapshot, GuessRequest, GuessResponse},
    error::AppError,
    services::game_service,
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/game",
    tag = "game",
    responses(
        (status = 200, description = "Full game snapshot", body = GameSnapshot),
        (status = 503, description = "Storage unavailable"),
    )
)]
/// Return the full projection of the current game.
pub async fn get_game(State(state): State<SharedState>) -> Result<Json<GameSnapshot>, AppError> {
    Ok(Json(game_service::snapshot(&state).await?))
}

#[utoipa::path(
    post,
    path = "/guesses",
    tag = "game",
    request_body = GuessRequest,
    responses(
        (status = 200, description = "Guess on record", body = GuessResponse),
        (status = 404, description = "Unknown guesser or guess target"),
        (status = 409, description = "Game has not ended yet"),
    )
)]
/// Record a player's one-shot guess at who their Cris Mom was.
pub async fn submit_guess(
    State(state): State<SharedState>,
    Json(payload): Json<GuessRequest>,
) -> Result<Json<GuessResponse>, AppError> {
    payload.validate()?;
    Ok(Json(game_service::submit_guess(&state, payload).await?))
}

/// Configure the game routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/game", get(get_game))
        .route("/guesses", post(submit_guess))
}
