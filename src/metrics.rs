use crate::error_tracker::ErrorSet;
use crate::settings::{Mode, TIMED_MODE_SECS};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharStatus {
    Correct,
    Incorrect,
    Untyped,
}

/// Display state of one passage character
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterStatus {
    pub ch: char,
    pub status: CharStatus,
    /// the position was typed wrong at some point, even if corrected since
    pub was_error: bool,
}

/// Final score of a finished attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub wpm: u32,
    pub accuracy: u32,
    pub correct_chars: usize,
    pub incorrect_chars: usize,
    pub time_elapsed: u64,
}

/// Coarse accuracy grading used for colouring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccuracyBand {
    High,
    Medium,
    Low,
}

impl AccuracyBand {
    pub fn of(accuracy: u32) -> Self {
        match accuracy {
            95.. => AccuracyBand::High,
            85..=94 => AccuracyBand::Medium,
            _ => AccuracyBand::Low,
        }
    }
}

/// Number of positions where the typed character matches the passage
pub fn count_correct(user_input: &str, passage: &str) -> usize {
    user_input
        .chars()
        .zip(passage.chars())
        .filter(|(typed, expected)| typed == expected)
        .count()
}

/// Words per minute over whitespace separated words.
///
/// Empty or all-whitespace input counts as zero words.
pub fn calculate_wpm(user_input: &str, time_elapsed_secs: u64) -> u32 {
    if time_elapsed_secs == 0 {
        return 0;
    }
    let words = user_input.split_whitespace().count();
    ((words as f64 / time_elapsed_secs as f64) * 60.0).round() as u32
}

/// Percentage of typed characters that match the passage, 100 when nothing is typed
pub fn calculate_accuracy(user_input: &str, passage: &str) -> u32 {
    let typed = user_input.chars().count();
    if typed == 0 {
        return 100;
    }
    percentage(count_correct(user_input, passage), typed)
}

fn percentage(part: usize, whole: usize) -> u32 {
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

pub fn generate_character_statuses(
    passage: &str,
    user_input: &str,
    errors: &ErrorSet,
) -> Vec<CharacterStatus> {
    let mut typed = user_input.chars();

    passage
        .chars()
        .enumerate()
        .map(|(idx, ch)| {
            let status = match typed.next() {
                None => CharStatus::Untyped,
                Some(c) if c == ch => CharStatus::Correct,
                Some(_) => CharStatus::Incorrect,
            };
            CharacterStatus {
                ch,
                status,
                was_error: errors.contains(idx),
            }
        })
        .collect()
}

pub fn calculate_final_results(user_input: &str, passage: &str, time_elapsed: u64) -> TestResult {
    let typed = user_input.chars().count();
    let correct_chars = count_correct(user_input, passage);

    TestResult {
        wpm: calculate_wpm(user_input, time_elapsed),
        accuracy: if typed > 0 {
            percentage(correct_chars, typed)
        } else {
            100
        },
        correct_chars,
        incorrect_chars: typed - correct_chars,
        time_elapsed,
    }
}

/// "M:SS" clock; counts down from 60 in timed mode and up in passage mode
pub fn format_time(time_elapsed: u64, mode: Mode) -> String {
    let shown = match mode {
        Mode::Timed => TIMED_MODE_SECS.saturating_sub(time_elapsed),
        Mode::Passage => time_elapsed,
    };
    format!("{}:{:02}", shown / 60, shown % 60)
}
