use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::fs;

use crate::dao::{
    models::GameStateEntity,
    state_store::StateStore,
    storage::StorageResult,
};

use super::error::{JsonFileError, JsonFileResult};

/// [`StateStore`] persisting the record as one JSON file on local disk.
///
/// Writes go to a sibling temp file first and are renamed over the record,
/// so a concurrent reader always observes either the previous or the next
/// complete blob, never a partial one.
#[derive(Clone)]
pub struct JsonFileStore {
    path: Arc<PathBuf>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating the parent directory when needed.
    pub async fn connect(path: PathBuf) -> JsonFileResult<Self> {
        ensure_parent_dir(&path).await?;
        Ok(Self {
            path: Arc::new(path),
        })
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut temp = path.as_os_str().to_owned();
        temp.push(".tmp");
        PathBuf::from(temp)
    }

    async fn read_record(path: &Path) -> JsonFileResult<GameStateEntity> {
        match fs::read(path).await {
            // No record yet: a brand-new game in registration phase.
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(GameStateEntity::default()),
            Err(source) => Err(JsonFileError::Io {
                path: path.to_path_buf(),
                operation: "read",
                source,
            }),
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| JsonFileError::Decode {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    async fn write_record(path: &Path, state: &GameStateEntity) -> JsonFileResult<()> {
        let bytes =
            serde_json::to_vec_pretty(state).map_err(|source| JsonFileError::Encode { source })?;

        let temp = Self::temp_path(path);
        fs::write(&temp, &bytes)
            .await
            .map_err(|source| JsonFileError::Io {
                path: temp.clone(),
                operation: "write",
                source,
            })?;

        fs::rename(&temp, path)
            .await
            .map_err(|source| JsonFileError::Io {
                path: path.to_path_buf(),
                operation: "rename",
                source,
            })
    }

    async fn remove_record(path: &Path) -> JsonFileResult<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(JsonFileError::Io {
                path: path.to_path_buf(),
                operation: "remove",
                source,
            }),
        }
    }

    async fn probe(path: &Path) -> JsonFileResult<()> {
        let parent = parent_dir(path);
        fs::metadata(parent)
            .await
            .map(|_| ())
            .map_err(|source| JsonFileError::Io {
                path: parent.to_path_buf(),
                operation: "probe",
                source,
            })
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

async fn ensure_parent_dir(path: &Path) -> JsonFileResult<()> {
    let parent = parent_dir(path);
    fs::create_dir_all(parent)
        .await
        .map_err(|source| JsonFileError::Io {
            path: parent.to_path_buf(),
            operation: "create dir",
            source,
        })
}

impl StateStore for JsonFileStore {
    fn load(&self) -> BoxFuture<'static, StorageResult<GameStateEntity>> {
        let path = Arc::clone(&self.path);
        Box::pin(async move { Ok(Self::read_record(&path).await?) })
    }

    fn save(&self, state: GameStateEntity) -> BoxFuture<'static, StorageResult<()>> {
        let path = Arc::clone(&self.path);
        Box::pin(async move { Ok(Self::write_record(&path, &state).await?) })
    }

    fn reset(&self) -> BoxFuture<'static, StorageResult<()>> {
        let path = Arc::clone(&self.path);
        Box::pin(async move { Ok(Self::remove_record(&path).await?) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let path = Arc::clone(&self.path);
        Box::pin(async move { Ok(Self::probe(&path).await?) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let path = Arc::clone(&self.path);
        Box::pin(async move { Ok(ensure_parent_dir(&path).await?) })
    }
}
