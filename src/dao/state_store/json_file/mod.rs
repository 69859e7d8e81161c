//! JSON-file backend persisting the game record as one local file.

mod error;
mod store;

pub use error::{JsonFileError, JsonFileResult};
pub use store::JsonFileStore;
