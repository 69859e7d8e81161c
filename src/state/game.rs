use std::time::SystemTime;

use indexmap::IndexMap;
use rand::{Rng, seq::SliceRandom};
use thiserror::Error;
use uuid::Uuid;

/// Points awarded for a task when no explicit value is recorded.
pub const DEFAULT_TASK_POINTS: u32 = 10;

/// Reason stored on a rejected task when the moderator does not supply one.
pub const DEFAULT_REJECTION_REASON: &str = "Task rejected by the moderator.";

/// Global game phase. Advances monotonically and never regresses; only a
/// full reset discards the aggregate and starts over at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Players can still sign up; no assignments exist yet.
    Registration,
    /// Every player has a Cris Child and a Cris Mom; tasks flow.
    Paired,
    /// The game is over; players may guess who their Mom was.
    Ended,
}

/// Lifecycle of a single dare task.
///
/// `Pending -> {Approved, Rejected}`, `Approved -> Completed`.
/// `Rejected` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Waiting for moderation.
    Pending,
    /// Cleared by the moderator and delivered to the Child.
    Approved,
    /// Refused by the moderator; never delivered.
    Rejected,
    /// Done by the Child; points have been credited.
    Completed,
}

/// Outcome chosen by the moderator for a pending task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationDecision {
    /// Deliver the task to its Child.
    Approve,
    /// Refuse the task, recording a reason.
    Reject,
}

/// A registered player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable identifier allocated at registration.
    pub id: Uuid,
    /// Display name, immutable after registration.
    pub name: String,
    /// Unique login handle, case-sensitive.
    pub employee_id: String,
    /// Plaintext credential chosen at registration; there is no reset flow.
    pub password: String,
    /// The player this user sends tasks to. Set exactly once by pairing.
    pub child_id: Option<Uuid>,
    /// The player who sends tasks to this user. Inverse of exactly one
    /// other user's `child_id`.
    pub mom_id: Option<Uuid>,
    /// The user's one-shot guess at who their Mom was, set after game end.
    pub guessed_mom_id: Option<Uuid>,
    /// Total points earned from completed tasks.
    pub score: u32,
}

/// A dare sent from a Mom to her Child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Stable identifier allocated at creation.
    pub id: Uuid,
    /// The sending Mom.
    pub from_id: Uuid,
    /// The receiving Child.
    pub to_id: Uuid,
    /// Free-text dare description, immutable.
    pub content: String,
    /// Current lifecycle state.
    pub status: TaskStatus,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Set only when the task is rejected.
    pub rejection_reason: Option<String>,
    /// Set only when the Child completes the task.
    pub feedback: Option<String>,
    /// Reward value fixed at creation.
    pub points: u32,
}

/// The aggregate root. Every engine operation is a pure transform on this
/// value; persistence is someone else's problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Global phase.
    pub status: GamePhase,
    /// All registered players, in registration order.
    pub users: IndexMap<Uuid, User>,
    /// All tasks ever created, in creation order.
    pub tasks: IndexMap<Uuid, Task>,
    /// Mirror of the presently authenticated user, persisted so a session
    /// survives reloads. Not authoritative; `users` is.
    pub current_user: Option<User>,
    /// Farewell message recorded when the game ends.
    pub end_game_message: Option<String>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            status: GamePhase::Registration,
            users: IndexMap::new(),
            tasks: IndexMap::new(),
            current_user: None,
            end_game_message: None,
        }
    }
}

/// Domain error taxonomy. All variants are recoverable conditions reported
/// directly to the caller; none are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The employee id is already taken by a registered player.
    #[error("employee id `{0}` is already registered")]
    DuplicateIdentity(String),
    /// The referenced user or task does not exist.
    #[error("{0} not found")]
    NotFound(String),
    /// Password does not match the stored credential.
    #[error("invalid credential")]
    InvalidCredential,
    /// Pairing needs at least two registered players.
    #[error("pairing requires at least 2 registered players, got {0}")]
    InsufficientPlayers(usize),
    /// The operation is not allowed in the current game phase.
    #[error("operation not allowed while the game is in the {0:?} phase")]
    InvalidPhase(GamePhase),
    /// The task is not in a state the requested transition starts from.
    #[error("task in state {from:?} cannot be {attempted}")]
    InvalidTransition {
        /// State the task was in when the transition was attempted.
        from: TaskStatus,
        /// Human-readable name of the attempted transition.
        attempted: &'static str,
    },
    /// The task has already been completed; points are never credited twice.
    #[error("task is already completed")]
    AlreadyCompleted,
}

impl GameState {
    /// Fresh registration-phase state with empty collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a user by their login handle (case-sensitive exact match).
    pub fn user_by_employee_id(&self, employee_id: &str) -> Option<&User> {
        self.users
            .values()
            .find(|user| user.employee_id == employee_id)
    }

    /// Append a new player and make them the session user.
    ///
    /// Fails with [`GameError::DuplicateIdentity`] when the employee id is
    /// already taken. Phase gating and the reserved admin handle are the
    /// caller's responsibility.
    pub fn register_user(
        &mut self,
        name: String,
        employee_id: String,
        password: String,
    ) -> Result<User, GameError> {
        if self.user_by_employee_id(&employee_id).is_some() {
            return Err(GameError::DuplicateIdentity(employee_id));
        }

        let user = User {
            id: Uuid::new_v4(),
            name,
            employee_id,
            password,
            child_id: None,
            mom_id: None,
            guessed_mom_id: None,
            score: 0,
        };

        self.users.insert(user.id, user.clone());
        self.current_user = Some(user.clone());
        Ok(user)
    }

    /// Authenticate a regular player and make them the session user.
    ///
    /// The reserved administrator handle never reaches this path; it is
    /// matched against a fixed credential upstream.
    pub fn authenticate(&mut self, employee_id: &str, password: &str) -> Result<User, GameError> {
        let user = self
            .user_by_employee_id(employee_id)
            .cloned()
            .ok_or_else(|| GameError::NotFound(format!("user `{employee_id}`")))?;

        if user.password != password {
            return Err(GameError::InvalidCredential);
        }

        self.current_user = Some(user.clone());
        Ok(user)
    }

    /// Drop the session user without touching the game data.
    pub fn logout(&mut self) {
        self.current_user = None;
    }

    /// Randomly assign every player a Cris Child along one directed cycle.
    ///
    /// Shuffles the roster uniformly, then links each player to the
    /// successor of their shuffled position: position `i` becomes Mom of
    /// position `(i + 1) % n`. With n >= 2 this yields exactly one cycle
    /// covering everyone, with no self-assignments.
    ///
    /// Re-running this would re-randomize all assignments, so it is only
    /// legal once, from the registration phase.
    pub fn perform_pairing<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GameError> {
        if self.status != GamePhase::Registration {
            return Err(GameError::InvalidPhase(self.status));
        }

        let count = self.users.len();
        if count < 2 {
            return Err(GameError::InsufficientPlayers(count));
        }

        let mut order: Vec<Uuid> = self.users.keys().copied().collect();
        order.shuffle(rng);

        for index in 0..count {
            let mom_id = order[index];
            let child_id = order[(index + 1) % count];

            if let Some(mom) = self.users.get_mut(&mom_id) {
                mom.child_id = Some(child_id);
            }
            if let Some(child) = self.users.get_mut(&child_id) {
                child.mom_id = Some(mom_id);
            }
        }

        self.status = GamePhase::Paired;
        self.sync_current_user();
        Ok(())
    }

    /// Create a pending task from a Mom to her Child.
    ///
    /// Both endpoints must be registered users; the Mom/Child relationship
    /// and content checks are enforced by the caller.
    pub fn create_task(
        &mut self,
        from_id: Uuid,
        to_id: Uuid,
        content: String,
    ) -> Result<Task, GameError> {
        for user_id in [from_id, to_id] {
            if !self.users.contains_key(&user_id) {
                return Err(GameError::NotFound(format!("user `{user_id}`")));
            }
        }

        let task = Task {
            id: Uuid::new_v4(),
            from_id,
            to_id,
            content,
            status: TaskStatus::Pending,
            created_at: SystemTime::now(),
            rejection_reason: None,
            feedback: None,
            points: DEFAULT_TASK_POINTS,
        };

        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    /// Approve or reject a pending task.
    ///
    /// Rejection records the supplied reason, falling back to
    /// [`DEFAULT_REJECTION_REASON`] when the moderator gives none.
    pub fn moderate_task(
        &mut self,
        task_id: Uuid,
        decision: ModerationDecision,
        rejection_reason: Option<String>,
    ) -> Result<Task, GameError> {
        let task = self
            .tasks
            .get_mut(&task_id)
            .ok_or_else(|| GameError::NotFound(format!("task `{task_id}`")))?;

        if task.status != TaskStatus::Pending {
            return Err(GameError::InvalidTransition {
                from: task.status,
                attempted: "moderated",
            });
        }

        match decision {
            ModerationDecision::Approve => {
                task.status = TaskStatus::Approved;
            }
            ModerationDecision::Reject => {
                task.status = TaskStatus::Rejected;
                task.rejection_reason = Some(
                    rejection_reason
                        .filter(|reason| !reason.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_REJECTION_REASON.to_string()),
                );
            }
        }

        Ok(task.clone())
    }

    /// Mark an approved task as completed and credit the Child.
    ///
    /// A second completion attempt fails with
    /// [`GameError::AlreadyCompleted`] and must never credit points again.
    pub fn complete_task(
        &mut self,
        task_id: Uuid,
        feedback: Option<String>,
    ) -> Result<Task, GameError> {
        let task = self
            .tasks
            .get_mut(&task_id)
            .ok_or_else(|| GameError::NotFound(format!("task `{task_id}`")))?;

        match task.status {
            TaskStatus::Approved => {}
            TaskStatus::Completed => return Err(GameError::AlreadyCompleted),
            other => {
                return Err(GameError::InvalidTransition {
                    from: other,
                    attempted: "completed",
                });
            }
        }

        task.status = TaskStatus::Completed;
        task.feedback = feedback;
        let (receiver, points) = (task.to_id, task.points);

        if let Some(child) = self.users.get_mut(&receiver) {
            child.score += points;
        }

        let task = self.tasks[&task_id].clone();
        self.sync_current_user();
        Ok(task)
    }

    /// Record a user's one-shot guess at who their Mom was.
    ///
    /// The first guess sticks; later calls are accepted but change nothing,
    /// so a guess can never be revised after seeing hints. Returns the user
    /// with whatever guess is now on record.
    pub fn submit_guess(&mut self, user_id: Uuid, guessed_mom_id: Uuid) -> Result<User, GameError> {
        if !self.users.contains_key(&guessed_mom_id) {
            return Err(GameError::NotFound(format!("user `{guessed_mom_id}`")));
        }

        let user = self
            .users
            .get_mut(&user_id)
            .ok_or_else(|| GameError::NotFound(format!("user `{user_id}`")))?;

        if user.guessed_mom_id.is_none() {
            user.guessed_mom_id = Some(guessed_mom_id);
        }

        let user = user.clone();
        self.sync_current_user();
        Ok(user)
    }

    /// End the game, recording the farewell message.
    ///
    /// Only legal from the paired phase. Terminal: no further pairing,
    /// task creation, or moderation afterwards.
    pub fn end_game(&mut self, message: String) -> Result<(), GameError> {
        if self.status != GamePhase::Paired {
            return Err(GameError::InvalidPhase(self.status));
        }

        self.status = GamePhase::Ended;
        self.end_game_message = Some(message);
        Ok(())
    }

    /// Refresh the persisted session mirror from the authoritative roster.
    fn sync_current_user(&mut self) {
        if let Some(session) = &self.current_user
            && let Some(user) = self.users.get(&session.id)
        {
            self.current_user = Some(user.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn register(state: &mut GameState, name: &str, employee_id: &str) -> User {
        state
            .register_user(name.into(), employee_id.into(), "secret".into())
            .unwrap()
    }

    fn paired_state(count: usize) -> GameState {
        let mut state = GameState::new();
        for index in 0..count {
            register(&mut state, &format!("Player {index}"), &format!("E{index}"));
        }
        state.perform_pairing(&mut rng()).unwrap();
        state
    }

    fn approved_task(state: &mut GameState) -> Task {
        let (mom_id, child_id) = {
            let mom = state.users.values().next().unwrap();
            (mom.id, mom.child_id.unwrap())
        };
        let task = state
            .create_task(mom_id, child_id, "Wear a hat".into())
            .unwrap();
        state
            .moderate_task(task.id, ModerationDecision::Approve, None)
            .unwrap()
    }

    #[test]
    fn fresh_state_is_empty_registration() {
        let state = GameState::new();
        assert_eq!(state.status, GamePhase::Registration);
        assert!(state.users.is_empty());
        assert!(state.tasks.is_empty());
        assert!(state.current_user.is_none());
        assert!(state.end_game_message.is_none());
    }

    #[test]
    fn registration_sets_session_user_and_zero_score() {
        let mut state = GameState::new();
        let user = register(&mut state, "Alice", "E1");

        assert_eq!(user.score, 0);
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.current_user.as_ref().unwrap().id, user.id);
    }

    #[test]
    fn duplicate_employee_id_is_rejected_without_mutation() {
        let mut state = GameState::new();
        register(&mut state, "Alice", "E1");

        let err = state
            .register_user("Impostor".into(), "E1".into(), "other".into())
            .unwrap_err();
        assert_eq!(err, GameError::DuplicateIdentity("E1".into()));
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.users.values().next().unwrap().name, "Alice");
    }

    #[test]
    fn employee_id_match_is_case_sensitive() {
        let mut state = GameState::new();
        register(&mut state, "Alice", "E1");

        // `e1` is a different handle, so this is a fresh registration.
        assert!(
            state
                .register_user("Eve".into(), "e1".into(), "pw".into())
                .is_ok()
        );
        assert_eq!(state.users.len(), 2);
    }

    #[test]
    fn authenticate_reports_not_found_and_bad_password() {
        let mut state = GameState::new();
        register(&mut state, "Alice", "E1");
        state.logout();

        assert!(matches!(
            state.authenticate("E9", "secret"),
            Err(GameError::NotFound(_))
        ));
        assert_eq!(
            state.authenticate("E1", "wrong"),
            Err(GameError::InvalidCredential)
        );
        assert!(state.current_user.is_none());

        let user = state.authenticate("E1", "secret").unwrap();
        assert_eq!(state.current_user.as_ref().unwrap().id, user.id);
    }

    #[test]
    fn pairing_fails_below_two_players_and_leaves_state_unchanged() {
        let mut state = GameState::new();
        register(&mut state, "Alice", "E1");
        let before = state.clone();

        let err = state.perform_pairing(&mut rng()).unwrap_err();
        assert_eq!(err, GameError::InsufficientPlayers(1));
        assert_eq!(state, before);
    }

    #[test]
    fn pairing_forms_a_single_full_cycle_for_many_sizes() {
        for count in 2..=9 {
            let state = paired_state(count);
            assert_eq!(state.status, GamePhase::Paired);

            for user in state.users.values() {
                let child = user.child_id.expect("every user has a child");
                let mom = user.mom_id.expect("every user has a mom");
                assert_ne!(child, user.id, "no self-assignment");
                assert_ne!(mom, user.id, "no self-assignment");
                // mom/child links must be mutual inverses.
                assert_eq!(state.users[&child].mom_id, Some(user.id));
                assert_eq!(state.users[&mom].child_id, Some(user.id));
            }

            // Following child links must visit every user exactly once
            // before returning to the start.
            let start = *state.users.keys().next().unwrap();
            let mut cursor = start;
            let mut visited = 0;
            loop {
                cursor = state.users[&cursor].child_id.unwrap();
                visited += 1;
                if cursor == start {
                    break;
                }
                assert!(visited <= count, "cycle longer than the roster");
            }
            assert_eq!(visited, count, "cycle must cover all {count} users");
        }
    }

    #[test]
    fn pairing_twice_is_an_invalid_phase() {
        let mut state = paired_state(3);
        assert_eq!(
            state.perform_pairing(&mut rng()),
            Err(GameError::InvalidPhase(GamePhase::Paired))
        );
    }

    #[test]
    fn created_tasks_are_pending_with_default_points() {
        let mut state = paired_state(2);
        let mom = state.users.values().next().unwrap().clone();
        let task = state
            .create_task(mom.id, mom.child_id.unwrap(), "Bring coffee".into())
            .unwrap();

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.points, DEFAULT_TASK_POINTS);
        assert!(state.tasks.contains_key(&task.id));
    }

    #[test]
    fn create_task_rejects_unknown_users() {
        let mut state = paired_state(2);
        let known = *state.users.keys().next().unwrap();
        assert!(matches!(
            state.create_task(known, Uuid::new_v4(), "dare".into()),
            Err(GameError::NotFound(_))
        ));
    }

    #[test]
    fn rejection_records_supplied_or_default_reason() {
        let mut state = paired_state(2);
        let mom = state.users.values().next().unwrap().clone();
        let child = mom.child_id.unwrap();

        let first = state.create_task(mom.id, child, "One".into()).unwrap();
        let first = state
            .moderate_task(
                first.id,
                ModerationDecision::Reject,
                Some("too risky".into()),
            )
            .unwrap();
        assert_eq!(first.status, TaskStatus::Rejected);
        assert_eq!(first.rejection_reason.as_deref(), Some("too risky"));

        let second = state.create_task(mom.id, child, "Two".into()).unwrap();
        let second = state
            .moderate_task(second.id, ModerationDecision::Reject, Some("   ".into()))
            .unwrap();
        assert_eq!(
            second.rejection_reason.as_deref(),
            Some(DEFAULT_REJECTION_REASON)
        );
    }

    #[test]
    fn moderation_is_only_legal_from_pending() {
        let mut state = paired_state(2);
        let task = approved_task(&mut state);

        let err = state
            .moderate_task(task.id, ModerationDecision::Reject, None)
            .unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidTransition {
                from: TaskStatus::Approved,
                attempted: "moderated",
            }
        );

        assert!(matches!(
            state.moderate_task(Uuid::new_v4(), ModerationDecision::Approve, None),
            Err(GameError::NotFound(_))
        ));
    }

    #[test]
    fn completion_credits_the_receiver_exactly_once() {
        let mut state = paired_state(2);
        let task = approved_task(&mut state);

        let done = state.complete_task(task.id, Some("fun!".into())).unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert_eq!(done.feedback.as_deref(), Some("fun!"));
        assert_eq!(state.users[&task.to_id].score, DEFAULT_TASK_POINTS);

        // Second completion must not double-credit.
        assert_eq!(
            state.complete_task(task.id, None),
            Err(GameError::AlreadyCompleted)
        );
        assert_eq!(state.users[&task.to_id].score, DEFAULT_TASK_POINTS);
    }

    #[test]
    fn completion_requires_an_approved_task() {
        let mut state = paired_state(2);
        let mom = state.users.values().next().unwrap().clone();
        let child = mom.child_id.unwrap();

        let pending = state.create_task(mom.id, child, "One".into()).unwrap();
        let err = state.complete_task(pending.id, None).unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidTransition {
                from: TaskStatus::Pending,
                attempted: "completed",
            }
        );

        let rejected = state.create_task(mom.id, child, "Two".into()).unwrap();
        state
            .moderate_task(rejected.id, ModerationDecision::Reject, None)
            .unwrap();
        let err = state.complete_task(rejected.id, None).unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidTransition {
                from: TaskStatus::Rejected,
                attempted: "completed",
            }
        );

        assert_eq!(state.users[&child].score, 0);
    }

    #[test]
    fn completion_syncs_the_session_mirror_score() {
        let mut state = paired_state(2);
        let task = approved_task(&mut state);
        let child = state.users[&task.to_id].clone();
        state.current_user = Some(child.clone());

        state.complete_task(task.id, None).unwrap();
        assert_eq!(
            state.current_user.as_ref().unwrap().score,
            DEFAULT_TASK_POINTS
        );
    }

    #[test]
    fn first_guess_wins_and_later_guesses_are_ignored() {
        let mut state = paired_state(3);
        state.end_game("Merry Christmas!".into()).unwrap();

        let ids: Vec<Uuid> = state.users.keys().copied().collect();
        let (guesser, first, second) = (ids[0], ids[1], ids[2]);

        state.submit_guess(guesser, first).unwrap();
        let after_retry = state.submit_guess(guesser, second).unwrap();
        assert_eq!(after_retry.guessed_mom_id, Some(first));
        assert_eq!(state.users[&guesser].guessed_mom_id, Some(first));
    }

    #[test]
    fn guess_rejects_unknown_users() {
        let mut state = paired_state(2);
        state.end_game("bye".into()).unwrap();
        let known = *state.users.keys().next().unwrap();

        assert!(matches!(
            state.submit_guess(Uuid::new_v4(), known),
            Err(GameError::NotFound(_))
        ));
        assert!(matches!(
            state.submit_guess(known, Uuid::new_v4()),
            Err(GameError::NotFound(_))
        ));
    }

    #[test]
    fn end_game_is_only_legal_from_paired() {
        let mut state = GameState::new();
        assert_eq!(
            state.end_game("too soon".into()),
            Err(GameError::InvalidPhase(GamePhase::Registration))
        );

        let mut state = paired_state(2);
        state.end_game("Merry Christmas!".into()).unwrap();
        assert_eq!(state.status, GamePhase::Ended);
        assert_eq!(state.end_game_message.as_deref(), Some("Merry Christmas!"));

        assert_eq!(
            state.end_game("again".into()),
            Err(GameError::InvalidPhase(GamePhase::Ended))
        );
    }

    #[test]
    fn end_to_end_two_player_round() {
        let mut state = GameState::new();
        let a = register(&mut state, "A", "E1");
        let b = register(&mut state, "B", "E2");
        state.perform_pairing(&mut rng()).unwrap();

        // With two players the cycle is forced: each is the other's Mom.
        let a_child = state.users[&a.id].child_id.unwrap();
        assert_eq!(a_child, b.id);
        assert_eq!(state.users[&b.id].mom_id, Some(a.id));

        let task = state.create_task(a.id, b.id, "Wear a hat".into()).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.points, 10);

        state
            .moderate_task(task.id, ModerationDecision::Approve, None)
            .unwrap();
        let done = state.complete_task(task.id, Some("fun!".into())).unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert_eq!(state.users[&b.id].score, 10);

        state.end_game("Merry Christmas!".into()).unwrap();
        let guesser = state.submit_guess(b.id, a.id).unwrap();
        assert_eq!(guesser.guessed_mom_id, state.users[&b.id].mom_id);
    }
}
