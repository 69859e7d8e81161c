//! Shared application state and the game engine.

pub mod game;
mod sse;

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, watch};

use crate::{
    config::AppConfig,
    dao::state_store::StateStore,
    error::ServiceError,
    services::suggestion_service::SuggestionProvider,
    state::game::{GameError, GameState},
};

pub use self::sse::{SseHub, SseState};

/// Cheaply clonable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Capacity of each SSE broadcast channel.
const SSE_CHANNEL_CAPACITY: usize = 16;

/// Central application state: the installed store, SSE hubs, runtime
/// configuration, and the gate serializing game mutations.
pub struct AppState {
    config: AppConfig,
    store: RwLock<Option<Arc<dyn StateStore>>>,
    sse: SseState,
    suggestions: SuggestionProvider,
    degraded: watch::Sender<bool>,
    /// Serializes load-mutate-save round trips within this process. Races
    /// across processes remain last-write-wins by design.
    write_gate: Mutex<()>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`].
    ///
    /// The application starts degraded until a store is installed by the
    /// storage supervisor.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        let suggestions = SuggestionProvider::new(config.suggestion.clone());
        Arc::new(Self {
            config,
            store: RwLock::new(None),
            sse: SseState::new(SSE_CHANNEL_CAPACITY),
            suggestions,
            degraded: degraded_tx,
            write_gate: Mutex::new(()),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle to the current store, if one is installed.
    pub async fn store(&self) -> Option<Arc<dyn StateStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Handle to the current store, or [`ServiceError::Degraded`].
    pub async fn require_store(&self) -> Result<Arc<dyn StateStore>, ServiceError> {
        self.store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a store implementation and leave degraded mode.
    pub async fn install_store(&self, store: Arc<dyn StateStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current store and enter degraded mode.
    pub async fn clear_store(&self) {
        {
            let mut guard = self.store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.store.read().await;
        guard.is_none()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }

    /// Broadcast hub for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        self.sse.public()
    }

    /// Broadcast hub for the admin SSE stream.
    pub fn admin_sse(&self) -> &SseHub {
        self.sse.admin()
    }

    /// Token guard ensuring a single admin SSE subscriber at a time.
    pub fn admin_token(&self) -> &Mutex<Option<String>> {
        self.sse.admin_token()
    }

    /// External suggestion provider for dare content.
    pub fn suggestions(&self) -> &SuggestionProvider {
        &self.suggestions
    }

    /// Load the current game aggregate without mutating it.
    pub async fn read_game(&self) -> Result<GameState, ServiceError> {
        let store = self.require_store().await?;
        let entity = store.load().await?;
        Ok(entity.into())
    }

    /// Run one engine operation as a full load-mutate-save round trip.
    ///
    /// The aggregate is re-read from the store, transformed by `mutate`,
    /// and written back before the result is returned. A failed transform
    /// writes nothing. Round trips are serialized by the write gate, so no
    /// reader in this process observes a half-applied operation.
    pub async fn with_game<F, T>(&self, mutate: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut GameState) -> Result<T, GameError>,
    {
        let store = self.require_store().await?;
        let _gate = self.write_gate.lock().await;

        let mut game: GameState = store.load().await?.into();
        let value = mutate(&mut game)?;
        store.save(game.into()).await?;
        Ok(value)
    }

    /// Discard the persisted record unconditionally.
    pub async fn reset_game(&self) -> Result<(), ServiceError> {
        let store = self.require_store().await?;
        let _gate = self.write_gate.lock().await;
        store.reset().await?;
        Ok(())
    }
}
