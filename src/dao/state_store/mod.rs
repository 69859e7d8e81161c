//! Store abstraction for the single persisted game record.

pub mod json_file;
pub mod memory;

use futures::future::BoxFuture;

use crate::dao::{models::GameStateEntity, storage::StorageResult};

/// Abstraction over the persistence medium holding the one serialized
/// game record.
///
/// `load` of an absent record yields the fresh registration-phase state;
/// `save` replaces the record atomically from a reader's perspective;
/// `reset` discards it unconditionally. The health hooks feed the storage
/// supervisor's degraded-mode tracking.
pub trait StateStore: Send + Sync {
    /// Read the current record, or the fresh default when none exists.
    fn load(&self) -> BoxFuture<'static, StorageResult<GameStateEntity>>;
    /// Replace the record with the given aggregate.
    fn save(&self, state: GameStateEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Discard the record; the next `load` starts from scratch.
    fn reset(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Cheap probe used by the supervisor's health poll.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish the backend after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
