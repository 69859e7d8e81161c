use crate::{
    dto::game::{GameSnapshot, GuessRequest, GuessResponse},
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        game::{GameError, GamePhase},
    },
};

/// Farewell shown when the moderator ends the round without a message.
const DEFAULT_END_MESSAGE: &str = "The game is over. Time to guess your Cris Mom!";

/// Project the full current game for REST clients.
pub async fn snapshot(state: &SharedState) -> Result<GameSnapshot, ServiceError> {
    let game = state.read_game().await?;
    let degraded = state.is_degraded().await;
    Ok(GameSnapshot::from_game(&game, degraded))
}

/// Draw the anonymous Mom → Child cycle over the registered roster.
pub async fn perform_pairing(state: &SharedState) -> Result<GameSnapshot, ServiceError> {
    state
        .with_game(|game| game.perform_pairing(&mut rand::rng()))
        .await?;

    sse_events::broadcast_state_changed(state, &GamePhase::Paired);
    snapshot(state).await
}

/// Close the round and record the farewell message.
pub async fn end_game(
    state: &SharedState,
    message: Option<String>,
) -> Result<GameSnapshot, ServiceError> {
    let message = message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_END_MESSAGE.to_string());

    state
        .with_game(|game| game.end_game(message.clone()))
        .await?;

    sse_events::broadcast_game_ended(state, Some(message));
    sse_events::broadcast_state_changed(state, &GamePhase::Ended);
    snapshot(state).await
}

/// Discard the whole persisted game and notify every open session.
pub async fn reset(state: &SharedState) -> Result<(), ServiceError> {
    state.reset_game().await?;
    sse_events::broadcast_game_reset(state);
    sse_events::broadcast_state_changed(state, &GamePhase::Registration);
    Ok(())
}

/// Record a player's one-shot guess at who their Mom was.
///
/// Guessing only opens once the round has ended; the first recorded guess
/// is final, and replays report the standing guess.
pub async fn submit_guess(
    state: &SharedState,
    request: GuessRequest,
) -> Result<GuessResponse, ServiceError> {
    let user = state
        .with_game(|game| {
            if game.status != GamePhase::Ended {
                return Err(GameError::InvalidPhase(game.status));
            }
            let user_id = game
                .user_by_employee_id(&request.employee_id)
                .map(|user| user.id)
                .ok_or_else(|| GameError::NotFound(format!("user `{}`", request.employee_id)))?;
            game.submit_guess(user_id, request.guessed_mom_id)
        })
        .await?;

    sse_events::broadcast_guess_recorded(state, user.id);
    sse_events::broadcast_state_changed(state, &GamePhase::Ended);

    // submit_guess guarantees a recorded guess on the returned user.
    let recorded = user.guessed_mom_id.unwrap_or(request.guessed_mom_id);
    Ok(GuessResponse {
        guessed_mom_id: recorded,
        correct: user.mom_id.is_some() && user.mom_id == Some(recorded),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::state_store::memory::MemoryStateStore,
        dto::{
            auth::RegisterRequest,
            phase::VisiblePhase,
            tasks::{
                CompleteTaskRequest, CreateTaskRequest, ModerateTaskRequest, ModerationDecisionDto,
                TaskStatusDto,
            },
        },
        services::{auth_service, task_service},
        state::AppState,
    };

    async fn test_state() -> SharedState {
        let state = AppState::new(AppConfig::default());
        state
            .install_store(Arc::new(MemoryStateStore::default()))
            .await;
        state
    }

    async fn register_players(state: &SharedState, handles: &[&str]) {
        for handle in handles {
            auth_service::register(
                state,
                RegisterRequest {
                    name: format!("Player {handle}"),
                    employee_id: (*handle).to_string(),
                    password: "pw".into(),
                },
            )
            .await
            .expect("registration succeeds");
        }
    }

    #[tokio::test]
    async fn full_round_from_registration_to_guessing() {
        let state = test_state().await;
        register_players(&state, &["EMP001", "EMP002", "EMP003"]).await;

        let snap = perform_pairing(&state).await.expect("pairing succeeds");
        assert_eq!(snap.status, VisiblePhase::Paired);

        let mom = snap.users[0].clone();
        let child_id = mom.child_id.expect("child assigned");
        let child = snap
            .users
            .iter()
            .find(|user| user.id == child_id)
            .expect("child registered")
            .clone();

        let task = task_service::create_task(
            &state,
            CreateTaskRequest {
                employee_id: mom.employee_id.clone(),
                content: "Tell a dad joke in the stand-up".into(),
            },
        )
        .await
        .expect("task filed");
        assert_eq!(task.to_id, child_id);
        assert_eq!(task.status, TaskStatusDto::Pending);

        let task = task_service::moderate_task(
            &state,
            task.id,
            ModerateTaskRequest {
                decision: ModerationDecisionDto::Approve,
                reason: None,
            },
        )
        .await
        .expect("moderation succeeds");
        assert_eq!(task.status, TaskStatusDto::Approved);

        let done = task_service::complete_task(
            &state,
            task.id,
            CompleteTaskRequest {
                employee_id: child.employee_id.clone(),
                feedback: Some("nailed it".into()),
            },
        )
        .await
        .expect("completion succeeds");
        assert_eq!(done.status, TaskStatusDto::Completed);

        let snap = snapshot(&state).await.expect("snapshot");
        let credited = snap
            .users
            .iter()
            .find(|user| user.id == child_id)
            .expect("child still registered");
        assert_eq!(credited.score, 10);

        let snap = end_game(&state, None).await.expect("end game");
        assert_eq!(snap.status, VisiblePhase::Ended);
        assert_eq!(snap.end_game_message.as_deref(), Some(DEFAULT_END_MESSAGE));

        // Child guesses correctly on the first try; the replay cannot revise it.
        let verdict = submit_guess(
            &state,
            GuessRequest {
                employee_id: child.employee_id.clone(),
                guessed_mom_id: mom.id,
            },
        )
        .await
        .expect("guess recorded");
        assert!(verdict.correct);

        let replay = submit_guess(
            &state,
            GuessRequest {
                employee_id: child.employee_id.clone(),
                guessed_mom_id: child.id,
            },
        )
        .await
        .expect("replay accepted");
        assert_eq!(replay.guessed_mom_id, mom.id);
        assert!(replay.correct);
    }

    #[tokio::test]
    async fn pairing_requires_two_players() {
        let state = test_state().await;
        register_players(&state, &["EMP001"]).await;

        let err = perform_pairing(&state).await.expect_err("must refuse");
        assert!(matches!(
            err,
            ServiceError::Game(GameError::InsufficientPlayers(1))
        ));

        let snap = snapshot(&state).await.expect("snapshot");
        assert_eq!(snap.status, VisiblePhase::Registration);
    }

    #[tokio::test]
    async fn guessing_is_closed_until_the_game_ends() {
        let state = test_state().await;
        register_players(&state, &["EMP001", "EMP002"]).await;
        perform_pairing(&state).await.expect("pairing succeeds");

        let snap = snapshot(&state).await.expect("snapshot");
        let guesser = snap.users[0].clone();
        let err = submit_guess(
            &state,
            GuessRequest {
                employee_id: guesser.employee_id,
                guessed_mom_id: snap.users[1].id,
            },
        )
        .await
        .expect_err("must refuse before ended");
        assert!(matches!(
            err,
            ServiceError::Game(GameError::InvalidPhase(GamePhase::Paired))
        ));
    }

    #[tokio::test]
    async fn second_completion_never_credits_twice() {
        let state = test_state().await;
        register_players(&state, &["EMP001", "EMP002"]).await;
        perform_pairing(&state).await.expect("pairing succeeds");

        let snap = snapshot(&state).await.expect("snapshot");
        let mom = snap.users[0].clone();
        let child = snap
            .users
            .iter()
            .find(|user| Some(user.id) == mom.child_id)
            .expect("child registered")
            .clone();

        let task = task_service::create_task(
            &state,
            CreateTaskRequest {
                employee_id: mom.employee_id.clone(),
                content: "Bring donuts".into(),
            },
        )
        .await
        .expect("task filed");
        task_service::moderate_task(
            &state,
            task.id,
            ModerateTaskRequest {
                decision: ModerationDecisionDto::Approve,
                reason: None,
            },
        )
        .await
        .expect("approved");

        let complete = |feedback: Option<String>| {
            task_service::complete_task(
                &state,
                task.id,
                CompleteTaskRequest {
                    employee_id: child.employee_id.clone(),
                    feedback,
                },
            )
        };
        complete(None).await.expect("first completion");
        let err = complete(None).await.expect_err("second must fail");
        assert!(matches!(
            err,
            ServiceError::Game(GameError::AlreadyCompleted)
        ));

        let snap = snapshot(&state).await.expect("snapshot");
        let credited = snap
            .users
            .iter()
            .find(|user| user.id == child.id)
            .expect("child still registered");
        assert_eq!(credited.score, 10);
    }

    #[tokio::test]
    async fn only_the_target_may_complete_a_dare() {
        let state = test_state().await;
        register_players(&state, &["EMP001", "EMP002"]).await;
        perform_pairing(&state).await.expect("pairing succeeds");

        let snap = snapshot(&state).await.expect("snapshot");
        let mom = snap.users[0].clone();
        let task = task_service::create_task(
            &state,
            CreateTaskRequest {
                employee_id: mom.employee_id.clone(),
                content: "Whistle the office anthem".into(),
            },
        )
        .await
        .expect("task filed");
        task_service::moderate_task(
            &state,
            task.id,
            ModerateTaskRequest {
                decision: ModerationDecisionDto::Approve,
                reason: None,
            },
        )
        .await
        .expect("approved");

        // The mom herself is never the target in a two-player cycle of dares
        // she authored.
        let err = task_service::complete_task(
            &state,
            task.id,
            CompleteTaskRequest {
                employee_id: mom.employee_id.clone(),
                feedback: None,
            },
        )
        .await
        .expect_err("author cannot complete");
        assert!(matches!(err, ServiceError::Game(GameError::NotFound(_))));
    }

    #[tokio::test]
    async fn reset_discards_everything() {
        let state = test_state().await;
        register_players(&state, &["EMP001", "EMP002"]).await;
        perform_pairing(&state).await.expect("pairing succeeds");

        reset(&state).await.expect("reset succeeds");

        let snap = snapshot(&state).await.expect("snapshot");
        assert_eq!(snap.status, VisiblePhase::Registration);
        assert!(snap.users.is_empty());
        assert!(snap.tasks.is_empty());
    }

    #[tokio::test]
    async fn degraded_mode_rejects_reads() {
        let state = AppState::new(AppConfig::default());
        let err = snapshot(&state).await.expect_err("no store installed");
        assert!(matches!(err, ServiceError::Degraded));
    }
}
