//! Application-level configuration loading: admin credentials, storage
//! location, and the dare suggestion provider.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "CRIS_MOM_BACK_CONFIG_PATH";
/// Environment variable carrying the suggestion provider API key.
const SUGGESTION_API_KEY_ENV: &str = "CRIS_MOM_SUGGESTION_API_KEY";

/// Default persisted-state location.
const DEFAULT_DATA_PATH: &str = "data/cris_mom_state.json";
/// Reserved moderator handle. Players cannot register with it.
const DEFAULT_ADMIN_EMPLOYEE_ID: &str = "ADMIN001";
/// Default moderator password. Override in the config file for anything
/// beyond an office party.
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
/// Default text generation endpoint used for dare suggestions.
const DEFAULT_SUGGESTION_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Moderator credentials.
    pub admin: AdminConfig,
    /// Persistence settings.
    pub storage: StorageConfig,
    /// Dare suggestion provider settings.
    pub suggestion: SuggestionConfig,
}

#[derive(Debug, Clone)]
/// Credentials accepted for the moderator session.
pub struct AdminConfig {
    /// Reserved handle the moderator logs in with.
    pub employee_id: String,
    /// Moderator password, compared verbatim.
    pub password: String,
}

#[derive(Debug, Clone)]
/// Persistence settings.
pub struct StorageConfig {
    /// Path of the JSON state record on disk.
    pub data_path: PathBuf,
}

#[derive(Debug, Clone)]
/// Dare suggestion provider settings.
pub struct SuggestionConfig {
    /// Text generation endpoint to POST to.
    pub api_url: String,
    /// API key appended as a query parameter. `None` disables outbound
    /// calls and serves the built-in fallback suggestion.
    pub api_key: Option<String>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in
    /// defaults when the file is absent or unreadable.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded configuration file");
                    Self::from(raw)
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };
        config.with_env_overrides()
    }

    /// Apply environment overrides on top of the file-based configuration.
    fn with_env_overrides(mut self) -> Self {
        if let Some(key) = env::var(SUGGESTION_API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
        {
            self.suggestion.api_key = Some(key);
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            admin: AdminConfig {
                employee_id: DEFAULT_ADMIN_EMPLOYEE_ID.to_owned(),
                password: DEFAULT_ADMIN_PASSWORD.to_owned(),
            },
            storage: StorageConfig {
                data_path: PathBuf::from(DEFAULT_DATA_PATH),
            },
            suggestion: SuggestionConfig {
                api_url: DEFAULT_SUGGESTION_API_URL.to_owned(),
                api_key: None,
            },
        }
    }
}

#[derive(Debug, Deserialize, Default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    admin: RawAdmin,
    #[serde(default)]
    storage: RawStorage,
    #[serde(default)]
    suggestion: RawSuggestion,
}

#[derive(Debug, Deserialize, Default)]
struct RawAdmin {
    employee_id: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawStorage {
    data_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct RawSuggestion {
    api_url: Option<String>,
    api_key: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            admin: AdminConfig {
                employee_id: value
                    .admin
                    .employee_id
                    .unwrap_or(defaults.admin.employee_id),
                password: value.admin.password.unwrap_or(defaults.admin.password),
            },
            storage: StorageConfig {
                data_path: value
                    .storage
                    .data_path
                    .unwrap_or(defaults.storage.data_path),
            },
            suggestion: SuggestionConfig {
                api_url: value
                    .suggestion
                    .api_url
                    .unwrap_or(defaults.suggestion.api_url),
                api_key: value.suggestion.api_key,
            },
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
