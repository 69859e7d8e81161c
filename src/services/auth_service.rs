use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, SessionRole},
        game::UserSummary,
    },
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        game::{GameError, GamePhase},
    },
};

/// Sign a new player up during the registration phase.
///
/// The reserved moderator handle is refused before the engine ever sees
/// it, whatever its casing.
pub async fn register(
    state: &SharedState,
    request: RegisterRequest,
) -> Result<UserSummary, ServiceError> {
    let reserved = &state.config().admin.employee_id;
    if request.employee_id.eq_ignore_ascii_case(reserved) {
        return Err(ServiceError::InvalidInput(format!(
            "employee id `{}` is reserved",
            request.employee_id
        )));
    }

    let user = state
        .with_game(|game| {
            if game.status != GamePhase::Registration {
                return Err(GameError::InvalidPhase(game.status));
            }
            game.register_user(request.name, request.employee_id, request.password)
        })
        .await?;

    let summary = UserSummary::from(&user);
    sse_events::broadcast_user_registered(state, summary.clone());
    sse_events::broadcast_state_changed(state, &GamePhase::Registration);
    Ok(summary)
}

/// Authenticate either the moderator or a regular player.
///
/// The moderator handle is matched against the fixed configured credential
/// and never consults the roster, so the moderator can sign in during any
/// phase, even before anyone registered.
pub async fn login(
    state: &SharedState,
    request: LoginRequest,
) -> Result<LoginResponse, ServiceError> {
    let admin = &state.config().admin;
    if request.employee_id == admin.employee_id {
        if request.password != admin.password {
            return Err(ServiceError::Game(GameError::InvalidCredential));
        }
        return Ok(LoginResponse {
            role: SessionRole::Admin,
            user: None,
        });
    }

    let user = state
        .with_game(|game| game.authenticate(&request.employee_id, &request.password))
        .await?;

    Ok(LoginResponse {
        role: SessionRole::Player,
        user: Some(UserSummary::from(&user)),
    })
}

/// Drop the persisted session mirror.
pub async fn logout(state: &SharedState) -> Result<(), ServiceError> {
    state
        .with_game(|game| {
            game.logout();
            Ok(())
        })
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::AppConfig, dao::state_store::memory::MemoryStateStore, state::AppState};

    async fn test_state() -> SharedState {
        let state = AppState::new(AppConfig::default());
        state
            .install_store(Arc::new(MemoryStateStore::default()))
            .await;
        state
    }

    fn register_request(employee_id: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Test Player".into(),
            employee_id: employee_id.into(),
            password: "secret".into(),
        }
    }

    #[tokio::test]
    async fn reserved_handle_is_refused_whatever_the_casing() {
        let state = test_state().await;
        for handle in ["ADMIN001", "admin001", "Admin001"] {
            let err = register(&state, register_request(handle))
                .await
                .expect_err("reserved handle must be refused");
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn duplicate_handle_conflicts() {
        let state = test_state().await;
        register(&state, register_request("EMP001"))
            .await
            .expect("first registration");
        let err = register(&state, register_request("EMP001"))
            .await
            .expect_err("second must conflict");
        assert!(matches!(
            err,
            ServiceError::Game(GameError::DuplicateIdentity(_))
        ));
    }

    #[tokio::test]
    async fn moderator_signs_in_with_the_fixed_credential() {
        // No store installed: the moderator path must not touch storage.
        let state = AppState::new(AppConfig::default());
        let response = login(
            &state,
            LoginRequest {
                employee_id: "ADMIN001".into(),
                password: "admin123".into(),
            },
        )
        .await
        .expect("moderator login succeeds");
        assert_eq!(response.role, SessionRole::Admin);
        assert!(response.user.is_none());
    }

    #[tokio::test]
    async fn player_login_checks_password_and_roster() {
        let state = test_state().await;
        register(&state, register_request("EMP001"))
            .await
            .expect("registration");

        let err = login(
            &state,
            LoginRequest {
                employee_id: "EMP001".into(),
                password: "wrong".into(),
            },
        )
        .await
        .expect_err("wrong password");
        assert!(matches!(
            err,
            ServiceError::Game(GameError::InvalidCredential)
        ));

        let err = login(
            &state,
            LoginRequest {
                employee_id: "EMP999".into(),
                password: "secret".into(),
            },
        )
        .await
        .expect_err("unknown handle");
        assert!(matches!(err, ServiceError::Game(GameError::NotFound(_))));

        let response = login(
            &state,
            LoginRequest {
                employee_id: "EMP001".into(),
                password: "secret".into(),
            },
        )
        .await
        .expect("valid login");
        assert_eq!(response.role, SessionRole::Player);
        assert_eq!(
            response.user.expect("player summary").employee_id,
            "EMP001"
        );
    }
}
