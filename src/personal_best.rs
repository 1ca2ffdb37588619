use crate::metrics::TestResult;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage key of the single personal best record
pub const PERSONAL_BEST_KEY: &str = "typing-test-personal-best";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalBest {
    pub wpm: u32,
    pub accuracy: u32,
    /// when the record was set; never part of the comparison
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achieved_at: Option<DateTime<Local>>,
}

impl PersonalBest {
    pub fn new(wpm: u32, accuracy: u32) -> Self {
        Self {
            wpm,
            accuracy,
            achieved_at: None,
        }
    }

    fn from_result(result: &TestResult) -> Self {
        Self::new(result.wpm, result.accuracy)
    }

    /// Strictly better on both speed and accuracy
    pub fn is_beaten_by(&self, result: &TestResult) -> bool {
        result.wpm > self.wpm && result.accuracy > self.accuracy
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// first recorded result
    Baseline,
    /// beat the stored record
    Improved,
    /// did not beat the stored record
    Standard,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub outcome: Outcome,
    /// the record after this result; the stored one for `Standard`
    pub best: PersonalBest,
}

impl Decision {
    pub fn replaces_best(&self) -> bool {
        self.outcome != Outcome::Standard
    }
}

pub fn decide_outcome(result: &TestResult, stored: Option<&PersonalBest>) -> Decision {
    match stored {
        None => Decision {
            outcome: Outcome::Baseline,
            best: PersonalBest::from_result(result),
        },
        Some(best) if best.is_beaten_by(result) => Decision {
            outcome: Outcome::Improved,
            best: PersonalBest::from_result(result),
        },
        Some(best) => Decision {
            outcome: Outcome::Standard,
            best: best.clone(),
        },
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unable to write store file")]
    Io(#[from] std::io::Error),
    #[error("unable to encode store contents")]
    Json(#[from] serde_json::Error),
}

/// Minimal persistent key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Key-value pairs kept as one JSON object on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable store file is moved before it gets replaced
    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("json.bak")
    }

    /// All entries; a missing file is empty, an unreadable one is None
    fn read_all(&self) -> Option<Map<String, Value>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Some(Map::new()),
            Err(err) => {
                tracing::warn!(error = %err, path = %self.path.display(), "unable to read store file");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(entries) => Some(entries),
            Err(err) => {
                tracing::warn!(error = %err, path = %self.path.display(), "store file is not a JSON object");
                None
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.read_all()?.remove(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = match self.read_all() {
            Some(entries) => entries,
            None => {
                // keep whatever was there instead of writing over it
                let backup = self.backup_path();
                fs::rename(&self.path, &backup)?;
                tracing::warn!(backup = %backup.display(), "moved unreadable store file aside");
                Map::new()
            }
        };
        entries.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&entries)?)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

/// Reads, compares and updates the personal best held in a store
#[derive(Debug)]
pub struct PersonalBestTracker<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PersonalBestTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The stored record; anything unreadable counts as no record
    pub fn load(&self) -> Option<PersonalBest> {
        let value = self.store.get(PERSONAL_BEST_KEY)?;
        match serde_json::from_value::<PersonalBest>(value) {
            Ok(best) if best.accuracy <= 100 => Some(best),
            Ok(best) => {
                tracing::warn!(accuracy = best.accuracy, "ignoring personal best with invalid accuracy");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed personal best");
                None
            }
        }
    }

    /// Classifies `result` and persists it when it becomes the new record
    pub fn record(&self, result: &TestResult) -> Decision {
        let stored = self.load();
        let mut decision = decide_outcome(result, stored.as_ref());

        if decision.replaces_best() {
            decision.best.achieved_at = Some(Local::now());
            tracing::info!(
                outcome = ?decision.outcome,
                wpm = decision.best.wpm,
                accuracy = decision.best.accuracy,
                "new personal best"
            );
            if let Err(err) = self.save(&decision.best) {
                tracing::warn!(error = %err, "unable to save personal best");
            }
        }
        decision
    }

    fn save(&self, best: &PersonalBest) -> Result<(), StoreError> {
        self.store.set(PERSONAL_BEST_KEY, serde_json::to_value(best)?)
    }
}
