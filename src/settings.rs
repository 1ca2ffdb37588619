use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Length of a timed test, in seconds
pub const TIMED_MODE_SECS: u64 = 60;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }

    /// Capitalized name for display, e.g. "Medium"
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// fixed 60 second test, counts down
    Timed,
    /// untimed, ends when the whole passage is typed
    Passage,
}

impl Mode {
    pub fn toggle(self) -> Self {
        match self {
            Mode::Timed => Mode::Passage,
            Mode::Passage => Mode::Timed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Timed => "Timed (60s)",
            Mode::Passage => "Passage",
        }
    }

    /// Time cap in seconds, if the mode has one
    pub fn time_limit_secs(self) -> Option<u64> {
        match self {
            Mode::Timed => Some(TIMED_MODE_SECS),
            Mode::Passage => None,
        }
    }
}
