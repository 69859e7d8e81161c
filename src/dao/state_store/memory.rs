//! Volatile store used by tests and as a stand-in backend.

use std::sync::{Arc, RwLock};

use futures::future::BoxFuture;

use crate::dao::{models::GameStateEntity, state_store::StateStore, storage::StorageResult};

/// In-memory [`StateStore`] holding the record behind an `RwLock`.
///
/// Clones share the same record, mirroring how every handle to a real
/// backend sees the same blob.
#[derive(Clone, Default)]
pub struct MemoryStateStore {
    record: Arc<RwLock<Option<GameStateEntity>>>,
}

impl MemoryStateStore {
    /// Create an empty store; the first `load` yields the fresh state.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> BoxFuture<'static, StorageResult<GameStateEntity>> {
        let record = Arc::clone(&self.record);
        Box::pin(async move {
            let guard = record.read().expect("state lock poisoned");
            Ok(guard.clone().unwrap_or_default())
        })
    }

    fn save(&self, state: GameStateEntity) -> BoxFuture<'static, StorageResult<()>> {
        let record = Arc::clone(&self.record);
        Box::pin(async move {
            let mut guard = record.write().expect("state lock poisoned");
            *guard = Some(state);
            Ok(())
        })
    }

    fn reset(&self) -> BoxFuture<'static, StorageResult<()>> {
        let record = Arc::clone(&self.record);
        Box::pin(async move {
            let mut guard = record.write().expect("state lock poisoned");
            guard.take();
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::GamePhaseEntity;

    #[tokio::test]
    async fn load_before_any_save_is_the_fresh_state() {
        let store = MemoryStateStore::new();
        let state = store.load().await.unwrap();
        assert_eq!(state.status, GamePhaseEntity::Registration);
        assert!(state.users.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips_and_reset_discards() {
        let store = MemoryStateStore::new();
        let mut state = GameStateEntity::default();
        state.status = GamePhaseEntity::Paired;

        store.save(state.clone()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), state);

        store.reset().await.unwrap();
        assert_eq!(
            store.load().await.unwrap().status,
            GamePhaseEntity::Registration
        );
    }
}
