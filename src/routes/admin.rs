use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::post,
};
use uuid::Uuid;

use crate::{
    dto::{
        game::{EndGameRequest, GameSnapshot},
        tasks::{ModerateTaskRequest, TaskSummary},
    },
    error::AppError,
    services::{game_service, sse_service, task_service},
    state::SharedState,
};

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Moderator-only endpoints driving the game lifecycle.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/admin/pairing", post(perform_pairing))
        .route("/admin/tasks/{id}/moderate", post(moderate_task))
        .route("/admin/game/end", post(end_game))
        .route("/admin/game/reset", post(reset_game))
        .route_layer(middleware::from_fn_with_state(state, require_admin_token))
}

#[utoipa::path(
    post,
    path = "/admin/pairing",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses(
        (status = 200, description = "Roster paired into one anonymous cycle", body = GameSnapshot),
        (status = 409, description = "Fewer than two players, or already paired"),
    )
)]
/// Draw the random Mom → Child cycle over every registered player.
pub async fn perform_pairing(
    State(state): State<SharedState>,
) -> Result<Json<GameSnapshot>, AppError> {
    Ok(Json(game_service::perform_pairing(&state).await?))
}

#[utoipa::path(
    post,
    path = "/admin/tasks/{id}/moderate",
    tag = "admin",
    params(
        ("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream"),
        ("id" = Uuid, Path, description = "Identifier of the dare to moderate"),
    ),
    request_body = ModerateTaskRequest,
    responses(
        (status = 200, description = "Verdict recorded", body = TaskSummary),
        (status = 404, description = "Unknown dare"),
        (status = 409, description = "Dare is no longer pending"),
    )
)]
/// Approve or reject a pending dare.
pub async fn moderate_task(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ModerateTaskRequest>,
) -> Result<Json<TaskSummary>, AppError> {
    Ok(Json(task_service::moderate_task(&state, id, payload).await?))
}

#[utoipa::path(
    post,
    path = "/admin/game/end",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = EndGameRequest,
    responses(
        (status = 200, description = "Round closed; guessing is open", body = GameSnapshot),
        (status = 409, description = "Game is not in the paired phase"),
    )
)]
/// Close the round and open the mom-guessing phase.
pub async fn end_game(
    State(state): State<SharedState>,
    Json(payload): Json<EndGameRequest>,
) -> Result<Json<GameSnapshot>, AppError> {
    Ok(Json(game_service::end_game(&state, payload.message).await?))
}

#[utoipa::path(
    post,
    path = "/admin/game/reset",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 204, description = "Persisted game discarded"))
)]
/// Discard the whole persisted game so a fresh round can start.
pub async fn reset_game(State(state): State<SharedState>) -> Result<StatusCode, AppError> {
    game_service::reset(&state).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reject requests without the token negotiated over the admin SSE stream.
async fn require_admin_token(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned())
        .ok_or_else(|| {
            AppError::Unauthorized("missing admin token header `X-Admin-Token`".into())
        })?;

    if !sse_service::verify_admin_token(&state, &provided).await {
        return Err(AppError::Unauthorized("invalid admin token".into()));
    }

    Ok(next.run(req).await)
}
