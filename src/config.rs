use crate::app_dirs::AppDirs;
use crate::settings::{Difficulty, Mode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Preferences remembered between runs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub difficulty: Difficulty,
    pub mode: Mode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Hard,
            mode: Mode::Timed,
        }
    }
}

impl Config {
    /// Command line values win over stored ones
    pub fn merged(self, difficulty: Option<Difficulty>, mode: Option<Mode>) -> Self {
        Self {
            difficulty: difficulty.unwrap_or(self.difficulty),
            mode: mode.unwrap_or(self.mode),
        }
    }
}

/// Where preferences live between runs
pub trait ConfigStore {
    /// Stored preferences, or the defaults when there are none
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> io::Result<()>;
}

/// Pretty printed JSON file, by default in the platform config directory
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self::with_path(AppDirs::config_path())
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            tracing::debug!(error = %err, path = %self.path.display(), "unreadable config, using defaults");
            Config::default()
        })
    }

    fn save(&self, cfg: &Config) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        tracing::debug!(path = %self.path.display(), "config saved");
        Ok(())
    }
}
