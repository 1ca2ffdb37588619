use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "typist";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("typist_config.json"))
    }

    /// Key-value store holding the personal best
    pub fn store_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.data_local_dir().join("store.json"))
            .unwrap_or_else(|| PathBuf::from("typist_store.json"))
    }

    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
                .join("typist.log")
        } else {
            Self::project()
                .map(|pd| pd.data_local_dir().join("typist.log"))
                .unwrap_or_else(|| PathBuf::from("typist.log"))
        }
    }
}
