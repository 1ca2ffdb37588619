use std::collections::BTreeSet;

/// Passage positions that have ever held a wrong character during an attempt.
///
/// Positions are only ever added; a corrected character stays in the set
/// until the attempt is reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSet {
    positions: BTreeSet<usize>,
}

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, position: usize) -> bool {
        self.positions.contains(&position)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.positions.iter().copied()
    }

    pub fn is_subset(&self, other: &ErrorSet) -> bool {
        self.positions.is_subset(&other.positions)
    }

    fn record_mismatches(&mut self, input: &str, passage: &str) {
        let mismatches = input
            .chars()
            .zip(passage.chars())
            .enumerate()
            .filter(|(_, (typed, expected))| typed != expected)
            .map(|(idx, _)| idx);
        self.positions.extend(mismatches);
    }
}

impl FromIterator<usize> for ErrorSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

/// Union of `existing` with every position where `new_input` differs from `passage`.
///
/// Only positions that exist in the passage are compared.
pub fn track_errors(new_input: &str, passage: &str, existing: &ErrorSet) -> ErrorSet {
    let mut errors = existing.clone();
    errors.record_mismatches(new_input, passage);
    errors
}
