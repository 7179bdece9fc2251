//! Persistent connection settings.
use crate::exercise_search::{DEFAULT_API_HOST, DEFAULT_API_URL};
use dirs_next as dirs;
use serde::{Deserialize, Serialize};

fn default_backend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_exercise_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_exercise_api_host() -> String {
    DEFAULT_API_HOST.to_string()
}

/// User configuration stored as JSON in the platform config directory.
///
/// Every field carries a serde default so files written by older versions,
/// or edited by hand, still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Base URL of the server exposing the `/data` collection.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_exercise_api_url")]
    pub exercise_api_url: String,
    #[serde(default = "default_exercise_api_host")]
    pub exercise_api_host: String,
    /// Overridden by `EXERCISE_API_KEY` when that is set.
    #[serde(default)]
    pub exercise_api_key: Option<String>,
    #[serde(default)]
    pub last_export_dir: Option<String>,
}

impl Settings {
    const FILE: &'static str = "workout_log_settings.json";

    pub fn path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    /// Load settings from the JSON configuration file, falling back to
    /// defaults when it is missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!("Ignoring invalid settings file {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) {
        let Some(path) = Self::path() else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Failed to create config dir: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(data) => {
                if let Err(e) = std::fs::write(&path, data) {
                    log::error!("Failed to save settings: {e}");
                }
            }
            Err(e) => log::error!("Failed to serialize settings: {e}"),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            exercise_api_url: default_exercise_api_url(),
            exercise_api_host: default_exercise_api_host(),
            exercise_api_key: None,
            last_export_dir: None,
        }
    }
}
