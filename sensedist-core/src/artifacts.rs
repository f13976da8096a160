//! Files produced by a run, named after the target word.

use std::path::{Component, Path, PathBuf};

use crate::error::{Result, SenseDistError};

const SEED_EXTENSION: &str = "seed";
const MODEL_EXTENSION: &str = "classifier";
const OUTPUT_EXTENSION: &str = "disambiguated";

/// Locations of the seed file, classifier model and captured output.
///
/// Every run overwrites all three.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use sensedist_core::RunArtifacts;
///
/// let artifacts = RunArtifacts::new(Path::new("out"), "bank").expect("word is valid");
/// assert_eq!(artifacts.seed(), Path::new("out/bank.seed"));
/// assert_eq!(artifacts.model(), Path::new("out/bank.classifier"));
/// assert_eq!(artifacts.output(), Path::new("out/bank.disambiguated"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArtifacts {
    seed: PathBuf,
    model: PathBuf,
    output: PathBuf,
}

impl RunArtifacts {
    /// Derives the artifact paths for `word` inside `dir`.
    ///
    /// # Errors
    /// Returns [`SenseDistError::InvalidWord`] when `word` is empty or is not
    /// a single plain path component.
    pub fn new(dir: &Path, word: &str) -> Result<Self> {
        validate_word(word)?;
        let with_extension = |extension: &str| dir.join(format!("{word}.{extension}"));
        Ok(Self {
            seed: with_extension(SEED_EXTENSION),
            model: with_extension(MODEL_EXTENSION),
            output: with_extension(OUTPUT_EXTENSION),
        })
    }

    /// Newline-delimited sense definitions.
    #[must_use]
    pub fn seed(&self) -> &Path {
        &self.seed
    }

    /// Model written by the training phase.
    #[must_use]
    pub fn model(&self) -> &Path {
        &self.model
    }

    /// Verbatim copy of the test-phase output.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }
}

fn validate_word(word: &str) -> Result<()> {
    let invalid = |reason| SenseDistError::InvalidWord {
        word: word.to_owned(),
        reason,
    };
    if word.trim().is_empty() {
        return Err(invalid("the word is empty"));
    }
    let mut components = Path::new(word).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !word.contains(['/', '\\']) => Ok(()),
        _ => Err(invalid("the word must not contain path separators or dots-only names")),
    }
}
