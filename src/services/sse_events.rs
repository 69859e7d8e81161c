use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::{
        game::UserSummary,
        phase::VisiblePhase,
        sse::{
            GameEndedEvent, GuessRecordedEvent, ServerEvent, StateChangedEvent, SystemStatus,
            TaskCompletedEvent, TaskCreatedEvent, TaskModeratedEvent, UserRegisteredEvent,
        },
        tasks::TaskSummary,
    },
    state::{SharedState, game::GamePhase},
};

pub const EVENT_STATE_CHANGED: &str = "state.changed";
const EVENT_USER_REGISTERED: &str = "user.registered";
const EVENT_TASK_CREATED: &str = "task.created";
const EVENT_TASK_MODERATED: &str = "task.moderated";
const EVENT_TASK_COMPLETED: &str = "task.completed";
const EVENT_GUESS_RECORDED: &str = "guess.recorded";
const EVENT_GAME_ENDED: &str = "game.ended";
const EVENT_GAME_RESET: &str = "game.reset";
const EVENT_SYSTEM_STATUS: &str = "system.status";

/// Generic "the persisted record changed, re-read it" hint sent to every
/// subscriber after a successful mutation.
pub fn broadcast_state_changed(state: &SharedState, phase: &GamePhase) {
    let payload = StateChangedEvent {
        phase: VisiblePhase::from(phase),
    };
    send_public_event(state, EVENT_STATE_CHANGED, &payload);
    send_admin_event(state, EVENT_STATE_CHANGED, &payload);
}

/// Broadcast that a new player joined the roster.
pub fn broadcast_user_registered(state: &SharedState, user: UserSummary) {
    let payload = UserRegisteredEvent { user };
    send_public_event(state, EVENT_USER_REGISTERED, &payload);
    send_admin_event(state, EVENT_USER_REGISTERED, &payload);
}

/// Notify the moderator that a dare awaits a verdict.
pub fn broadcast_task_created(state: &SharedState, task: TaskSummary) {
    let payload = TaskCreatedEvent { task };
    send_admin_event(state, EVENT_TASK_CREATED, &payload);
}

/// Broadcast a moderation verdict so the authoring mom sees it land.
pub fn broadcast_task_moderated(state: &SharedState, task: TaskSummary) {
    let payload = TaskModeratedEvent { task };
    send_public_event(state, EVENT_TASK_MODERATED, &payload);
    send_admin_event(state, EVENT_TASK_MODERATED, &payload);
}

/// Broadcast a completed dare together with the child's new total.
pub fn broadcast_task_completed(state: &SharedState, task: TaskSummary, score: u32) {
    let payload = TaskCompletedEvent { task, score };
    send_public_event(state, EVENT_TASK_COMPLETED, &payload);
    send_admin_event(state, EVENT_TASK_COMPLETED, &payload);
}

/// Broadcast that a player locked in their mom guess.
pub fn broadcast_guess_recorded(state: &SharedState, user_id: Uuid) {
    let payload = GuessRecordedEvent { user_id };
    send_public_event(state, EVENT_GUESS_RECORDED, &payload);
    send_admin_event(state, EVENT_GUESS_RECORDED, &payload);
}

/// Broadcast the farewell message when the moderator closes the round.
pub fn broadcast_game_ended(state: &SharedState, message: Option<String>) {
    let payload = GameEndedEvent { message };
    send_public_event(state, EVENT_GAME_ENDED, &payload);
    send_admin_event(state, EVENT_GAME_ENDED, &payload);
}

/// Tell every open session to restart after a full reset.
pub fn broadcast_game_reset(state: &SharedState) {
    send_public_event(state, EVENT_GAME_RESET, &());
    send_admin_event(state, EVENT_GAME_RESET, &());
}

/// Broadcast a degraded mode flip to every subscriber.
pub fn broadcast_system_status(state: &SharedState, degraded: bool) {
    let payload = SystemStatus { degraded };
    send_public_event(state, EVENT_SYSTEM_STATUS, &payload);
    send_admin_event(state, EVENT_SYSTEM_STATUS, &payload);
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}

fn send_admin_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.admin_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize admin SSE payload"),
    }
}
