/// Registration, login and session bookkeeping.
pub mod auth_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Pairing, guessing and whole-game lifecycle operations.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Storage supervision and degraded mode management.
pub mod storage_supervisor;
/// Dare suggestion provider backed by an external text generation API.
pub mod suggestion_service;
/// Dare creation, moderation and completion.
pub mod task_service;
