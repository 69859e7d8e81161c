use uuid::Uuid;

use crate::{
    dto::tasks::{CompleteTaskRequest, CreateTaskRequest, ModerateTaskRequest, TaskSummary},
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        game::{GameError, GamePhase},
    },
};

/// File a new dare from a mom to her child.
///
/// The target is never chosen by the caller: a mom can only dare the
/// child the pairing cycle assigned to her.
pub async fn create_task(
    state: &SharedState,
    request: CreateTaskRequest,
) -> Result<TaskSummary, ServiceError> {
    let task = state
        .with_game(|game| {
            if game.status != GamePhase::Paired {
                return Err(GameError::InvalidPhase(game.status));
            }
            let mom = game
                .user_by_employee_id(&request.employee_id)
                .ok_or_else(|| GameError::NotFound(format!("user `{}`", request.employee_id)))?;
            let from_id = mom.id;
            let to_id = mom
                .child_id
                .ok_or_else(|| GameError::NotFound(format!("child of `{from_id}`")))?;
            game.create_task(from_id, to_id, request.content)
        })
        .await?;

    let summary = TaskSummary::from(&task);
    sse_events::broadcast_task_created(state, summary.clone());
    sse_events::broadcast_state_changed(state, &GamePhase::Paired);
    Ok(summary)
}

/// Approve or reject a pending dare.
pub async fn moderate_task(
    state: &SharedState,
    task_id: Uuid,
    request: ModerateTaskRequest,
) -> Result<TaskSummary, ServiceError> {
    let task = state
        .with_game(|game| {
            if game.status != GamePhase::Paired {
                return Err(GameError::InvalidPhase(game.status));
            }
            game.moderate_task(task_id, request.decision.into(), request.reason)
        })
        .await?;

    let summary = TaskSummary::from(&task);
    sse_events::broadcast_task_moderated(state, summary.clone());
    sse_events::broadcast_state_changed(state, &GamePhase::Paired);
    Ok(summary)
}

/// Mark an approved dare as done and credit its target.
pub async fn complete_task(
    state: &SharedState,
    task_id: Uuid,
    request: CompleteTaskRequest,
) -> Result<TaskSummary, ServiceError> {
    let (task, score, phase) = state
        .with_game(|game| {
            let performer = game
                .user_by_employee_id(&request.employee_id)
                .map(|user| user.id)
                .ok_or_else(|| GameError::NotFound(format!("user `{}`", request.employee_id)))?;

            let target = game
                .tasks
                .get(&task_id)
                .ok_or_else(|| GameError::NotFound(format!("task `{task_id}`")))?
                .to_id;
            if performer != target {
                return Err(GameError::NotFound(format!(
                    "task `{task_id}` for `{}`",
                    request.employee_id
                )));
            }

            let task = game.complete_task(task_id, request.feedback)?;
            let score = game
                .users
                .get(&task.to_id)
                .map(|user| user.score)
                .unwrap_or_default();
            Ok((task, score, game.status))
        })
        .await?;

    let summary = TaskSummary::from(&task);
    sse_events::broadcast_task_completed(state, summary.clone(), score);
    sse_events::broadcast_state_changed(state, &phase);
    Ok(summary)
}
