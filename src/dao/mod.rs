//! Persistence layer: serialized entities, the store abstraction, and its
//! backends.

pub mod models;
pub mod state_store;
pub mod storage;
