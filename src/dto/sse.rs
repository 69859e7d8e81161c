use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{game::UserSummary, phase::VisiblePhase, tasks::TaskSummary};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Build an event from an already-rendered data payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Identifier of the SSE stream (`public` or `admin`).
    pub stream: String,
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether the backend is running without a storage backend connection.
    pub degraded: bool,
    /// Optional admin token returned when the stream is privileged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the backend enters or leaves degraded mode.
pub struct SystemStatus {
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Broadcast after every persisted mutation so clients re-fetch the snapshot.
pub struct StateChangedEvent {
    pub phase: VisiblePhase,
}

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted when a new player has registered.
pub struct UserRegisteredEvent {
    pub user: UserSummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted towards the moderator when a mom files a dare.
pub struct TaskCreatedEvent {
    pub task: TaskSummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Event emitted when a dare has been approved or rejected.
pub struct TaskModeratedEvent {
    pub task: TaskSummary,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Event emitted when a child completes an approved dare.
pub struct TaskCompletedEvent {
    pub task: TaskSummary,
    /// New total score of the credited child.
    pub score: u32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Event emitted when the moderator closes the round.
pub struct GameEndedEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Event emitted when a guess has been recorded.
pub struct GuessRecordedEvent {
    pub user_id: Uuid,
}
