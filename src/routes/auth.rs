use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use validator::Validate;

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        game::UserSummary,
    },
    error::AppError,
    services::auth_service,
    state::SharedState,
};

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Player registered", body = UserSummary),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Employee id already taken or registration closed"),
    )
)]
/// Sign a new player up while registration is open.
pub async fn register(
    State(state): State<SharedState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserSummary>), AppError> {
    payload.validate()?;
    let user = auth_service::register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "Unknown employee id"),
    )
)]
/// Authenticate the moderator or a registered player.
pub async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;
    Ok(Json(auth_service::login(&state, payload).await?))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses((status = 204, description = "Session dropped"))
)]
/// Drop the persisted session mirror.
pub async fn logout(State(state): State<SharedState>) -> Result<StatusCode, AppError> {
    auth_service::logout(&state).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Configure the authentication routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}
