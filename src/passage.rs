use crate::settings::Difficulty;
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

static PASSAGE_DIR: Dir = include_dir!("src/passages");

/// A single piece of text to be typed
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Passage {
    pub text: String,
}

impl Passage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Error)]
pub enum PassageError {
    #[error("no passages registered for {0} difficulty")]
    NoPassages(Difficulty),
    #[error("passage #{index} for {difficulty} difficulty is empty")]
    EmptyPassage { difficulty: Difficulty, index: usize },
    #[error("passage file {0} is missing")]
    MissingFile(String),
    #[error("passage file {0} is not valid utf-8")]
    InvalidEncoding(String),
    #[error("unable to read passage file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse passage file {origin}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of passages, grouped by difficulty
pub trait PassageProvider {
    /// All passages registered for `difficulty`, in file order
    fn passages(&self, difficulty: Difficulty) -> &[Passage];

    /// Uniformly random passage text for `difficulty`
    fn select_passage(&self, difficulty: Difficulty) -> Result<String, PassageError> {
        choose_passage(self.passages(difficulty), difficulty, &mut rand::thread_rng())
    }
}

pub fn choose_passage<R: Rng + ?Sized>(
    passages: &[Passage],
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<String, PassageError> {
    let passage = passages
        .choose(rng)
        .ok_or(PassageError::NoPassages(difficulty))?;
    tracing::debug!(%difficulty, chars = passage.text.chars().count(), "selected passage");
    Ok(passage.text.clone())
}

/// Validated set of passages covering every difficulty
#[derive(Debug, Clone)]
pub struct PassageLibrary {
    tiers: HashMap<Difficulty, Vec<Passage>>,
}

impl PassageLibrary {
    /// Builds a library, rejecting tiers without passages and blank passages
    pub fn from_tiers(tiers: HashMap<Difficulty, Vec<Passage>>) -> Result<Self, PassageError> {
        for difficulty in Difficulty::ALL {
            let passages = tiers
                .get(&difficulty)
                .filter(|p| !p.is_empty())
                .ok_or(PassageError::NoPassages(difficulty))?;

            if let Some(index) = passages.iter().position(|p| p.text.trim().is_empty()) {
                return Err(PassageError::EmptyPassage { difficulty, index });
            }
        }
        Ok(Self { tiers })
    }

    /// The passages compiled into the binary
    pub fn embedded() -> Result<Self, PassageError> {
        let mut tiers = HashMap::new();
        for difficulty in Difficulty::ALL {
            let file_name = tier_file_name(difficulty);
            let file = PASSAGE_DIR
                .get_file(&file_name)
                .ok_or_else(|| PassageError::MissingFile(file_name.clone()))?;
            let contents = file
                .contents_utf8()
                .ok_or_else(|| PassageError::InvalidEncoding(file_name.clone()))?;
            tiers.insert(difficulty, parse_tier(contents, &file_name)?);
        }
        Self::from_tiers(tiers)
    }

    /// Loads `easy.json`, `medium.json` and `hard.json` from `dir`
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, PassageError> {
        let mut tiers = HashMap::new();
        for difficulty in Difficulty::ALL {
            let path = dir.as_ref().join(tier_file_name(difficulty));
            let contents = fs::read_to_string(&path).map_err(|source| PassageError::Io {
                path: path.clone(),
                source,
            })?;
            tiers.insert(
                difficulty,
                parse_tier(&contents, &path.display().to_string())?,
            );
        }
        Self::from_tiers(tiers)
    }

    /// A library where every difficulty holds the same single passage
    pub fn single(text: impl Into<String>) -> Result<Self, PassageError> {
        let passage = Passage::new(text);
        let tiers = Difficulty::ALL
            .into_iter()
            .map(|d| (d, vec![passage.clone()]))
            .collect();
        Self::from_tiers(tiers)
    }
}

impl PassageProvider for PassageLibrary {
    fn passages(&self, difficulty: Difficulty) -> &[Passage] {
        self.tiers
            .get(&difficulty)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn tier_file_name(difficulty: Difficulty) -> String {
    format!("{difficulty}.json")
}

fn parse_tier(contents: &str, origin: &str) -> Result<Vec<Passage>, PassageError> {
    serde_json::from_str(contents).map_err(|source| PassageError::Parse {
        origin: origin.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn tiers_with(easy: &[&str], medium: &[&str], hard: &[&str]) -> HashMap<Difficulty, Vec<Passage>> {
        let to_vec = |texts: &[&str]| texts.iter().map(|t| Passage::new(*t)).collect::<Vec<_>>();
        HashMap::from([
            (Difficulty::Easy, to_vec(easy)),
            (Difficulty::Medium, to_vec(medium)),
            (Difficulty::Hard, to_vec(hard)),
        ])
    }

    #[test]
    fn test_embedded_library_covers_every_difficulty() {
        let library = PassageLibrary::embedded().unwrap();

        for difficulty in Difficulty::ALL {
            let passages = library.passages(difficulty);
            assert!(!passages.is_empty());
            assert!(passages.iter().all(|p| !p.text.is_empty()));
        }
    }

    #[test]
    fn test_select_passage_returns_registered_text() {
        let library = PassageLibrary::embedded().unwrap();

        let text = library.select_passage(Difficulty::Medium).unwrap();

        assert!(library
            .passages(Difficulty::Medium)
            .iter()
            .any(|p| p.text == text));
    }

    #[test]
    fn test_choose_passage_is_roughly_uniform() {
        let passages: Vec<Passage> = ["a", "b", "c"].into_iter().map(Passage::new).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: HashMap<String, usize> = HashMap::new();

        for _ in 0..3000 {
            let text = choose_passage(&passages, Difficulty::Easy, &mut rng).unwrap();
            *counts.entry(text).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 3);
        assert!(counts.values().all(|&n| n > 800), "{counts:?}");
    }

    #[test]
    fn test_choose_passage_from_empty_tier() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = choose_passage(&[], Difficulty::Hard, &mut rng);
        assert_matches!(result, Err(PassageError::NoPassages(Difficulty::Hard)));
    }

    #[test]
    fn test_from_tiers_rejects_missing_tier() {
        let mut tiers = tiers_with(&["one"], &["two"], &["three"]);
        tiers.remove(&Difficulty::Medium);

        let result = PassageLibrary::from_tiers(tiers);

        assert_matches!(result, Err(PassageError::NoPassages(Difficulty::Medium)));
    }

    #[test]
    fn test_from_tiers_rejects_blank_passage() {
        let tiers = tiers_with(&["one"], &["two"], &["three", "   "]);

        let result = PassageLibrary::from_tiers(tiers);

        assert_matches!(
            result,
            Err(PassageError::EmptyPassage {
                difficulty: Difficulty::Hard,
                index: 1
            })
        );
    }

    #[test]
    fn test_single_registers_for_all_tiers() {
        let library = PassageLibrary::single("just this").unwrap();

        for difficulty in Difficulty::ALL {
            assert_eq!(library.select_passage(difficulty).unwrap(), "just this");
        }
    }

    #[test]
    fn test_single_rejects_empty_text() {
        assert!(PassageLibrary::single("").is_err());
    }

    #[test]
    fn test_from_dir_reads_tier_files() {
        let dir = tempdir().unwrap();
        for (name, text) in [("easy", "aa"), ("medium", "bb"), ("hard", "cc")] {
            let json = format!(r#"[{{ "text": "{text}" }}]"#);
            fs::write(dir.path().join(format!("{name}.json")), json).unwrap();
        }

        let library = PassageLibrary::from_dir(dir.path()).unwrap();

        assert_eq!(library.passages(Difficulty::Easy), &[Passage::new("aa")]);
        assert_eq!(library.passages(Difficulty::Hard), &[Passage::new("cc")]);
    }

    #[test]
    fn test_from_dir_missing_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("easy.json"), r#"[{"text": "x"}]"#).unwrap();

        let result = PassageLibrary::from_dir(dir.path());

        assert_matches!(result, Err(PassageError::Io { .. }));
    }

    #[test]
    fn test_from_dir_invalid_json() {
        let dir = tempdir().unwrap();
        for name in ["easy", "medium", "hard"] {
            fs::write(dir.path().join(format!("{name}.json")), "{ not json").unwrap();
        }

        let result = PassageLibrary::from_dir(dir.path());

        assert_matches!(result, Err(PassageError::Parse { .. }));
    }
}
