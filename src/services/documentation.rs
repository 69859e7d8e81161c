use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Cris Mom Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::sse::admin_stream,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::game::get_game,
        crate::routes::game::submit_guess,
        crate::routes::tasks::create_task,
        crate::routes::tasks::complete_task,
        crate::routes::tasks::get_suggestion,
        crate::routes::admin::perform_pairing,
        crate::routes::admin::moderate_task,
        crate::routes::admin::end_game,
        crate::routes::admin::reset_game,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::auth::RegisterRequest,
            crate::dto::auth::LoginRequest,
            crate::dto::auth::LoginResponse,
            crate::dto::auth::SessionRole,
            crate::dto::phase::VisiblePhase,
            crate::dto::game::UserSummary,
            crate::dto::game::GameSnapshot,
            crate::dto::game::EndGameRequest,
            crate::dto::game::GuessRequest,
            crate::dto::game::GuessResponse,
            crate::dto::tasks::CreateTaskRequest,
            crate::dto::tasks::ModerateTaskRequest,
            crate::dto::tasks::ModerationDecisionDto,
            crate::dto::tasks::TaskStatusDto,
            crate::dto::tasks::CompleteTaskRequest,
            crate::dto::tasks::TaskSummary,
            crate::dto::tasks::SuggestionResponse,
            crate::dto::sse::Handshake,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and login"),
        (name = "game", description = "Game snapshot and mom guessing"),
        (name = "tasks", description = "Dare creation and completion"),
        (name = "admin", description = "Moderator-only lifecycle operations"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;
