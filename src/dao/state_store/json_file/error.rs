use std::path::PathBuf;

use thiserror::Error;

use crate::dao::storage::StorageError;

/// Result alias for the JSON-file backend.
pub type JsonFileResult<T> = Result<T, JsonFileError>;

/// Failures specific to the file-backed store.
#[derive(Debug, Error)]
pub enum JsonFileError {
    /// Filesystem access failed.
    #[error("io failure on `{path}` during {operation}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// What the store was doing.
        operation: &'static str,
        /// Underlying io error.
        #[source]
        source: std::io::Error,
    },
    /// The record on disk is not valid JSON for the current schema.
    #[error("cannot decode game record at `{path}`")]
    Decode {
        /// File holding the record.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
    /// The aggregate could not be serialized before writing.
    #[error("cannot encode game record")]
    Encode {
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

impl From<JsonFileError> for StorageError {
    fn from(err: JsonFileError) -> Self {
        match err {
            JsonFileError::Decode { ref path, .. } => {
                StorageError::corrupt(format!("game record at `{}`", path.display()), err)
            }
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
