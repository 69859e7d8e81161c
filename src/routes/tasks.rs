use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::tasks::{CompleteTaskRequest, CreateTaskRequest, SuggestionResponse, TaskSummary},
    error::AppError,
    services::task_service,
    state::SharedState,
};

#[utoipa::path(
    post,
    path = "/tasks",
    tag = "tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Dare filed for moderation", body = TaskSummary),
        (status = 404, description = "Unknown author"),
        (status = 409, description = "Game is not in the paired phase"),
    )
)]
/// File a new dare from a mom to her child.
pub async fn create_task(
    State(state): State<SharedState>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskSummary>), AppError> {
    payload.validate()?;
    let task = task_service::create_task(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    post,
    path = "/tasks/{id}/complete",
    tag = "tasks",
    params(("id" = Uuid, Path, description = "Identifier of the dare to complete")),
    request_body = CompleteTaskRequest,
    responses(
        (status = 200, description = "Dare completed and points credited", body = TaskSummary),
        (status = 404, description = "Unknown dare, or not addressed to this player"),
        (status = 409, description = "Dare is not approved, or already completed"),
    )
)]
/// Mark an approved dare done; its target is credited exactly once.
pub async fn complete_task(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteTaskRequest>,
) -> Result<Json<TaskSummary>, AppError> {
    payload.validate()?;
    Ok(Json(task_service::complete_task(&state, id, payload).await?))
}

#[utoipa::path(
    get,
    path = "/suggestion",
    tag = "tasks",
    responses((status = 200, description = "One dare idea", body = SuggestionResponse))
)]
/// Serve a dare idea; never fails, falling back to a stock suggestion.
pub async fn get_suggestion(State(state): State<SharedState>) -> Json<SuggestionResponse> {
    let suggestion = state.suggestions().suggest().await;
    Json(SuggestionResponse { suggestion })
}

/// Configure the dare routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/tasks", post(create_task))
        .route("/tasks/{id}/complete", post(complete_task))
        .route("/suggestion", get(get_suggestion))
}
