//! Line-oriented input corpus.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, SenseDistError};

/// The text to disambiguate, one occurrence context per line.
///
/// # Examples
/// ```
/// use sensedist_core::Corpus;
///
/// let corpus = Corpus::from_text("bank", "the river bank\r\nthe bank loan\n");
/// assert_eq!(corpus.lines(), &["the river bank", "the bank loan"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    path: PathBuf,
    lines: Vec<String>,
}

impl Corpus {
    /// Reads the corpus at `path`. Invalid UTF-8 is replaced rather than
    /// rejected, because the classifier itself treats the file as bytes.
    ///
    /// # Errors
    /// Returns [`SenseDistError::InputNotFound`] when `path` does not name a
    /// regular file and [`SenseDistError::Io`] for other read failures.
    pub fn read(path: &Path) -> Result<Self> {
        let not_found = || SenseDistError::InputNotFound {
            path: path.to_path_buf(),
        };
        let metadata = fs::metadata(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => not_found(),
            _ => SenseDistError::io(path, source),
        })?;
        if !metadata.is_file() {
            return Err(not_found());
        }
        let bytes = fs::read(path).map_err(|source| SenseDistError::io(path, source))?;
        Ok(Self::from_text(path, &String::from_utf8_lossy(&bytes)))
    }

    /// Builds a corpus from in-memory text attributed to `path`.
    #[must_use]
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            lines: text.lines().map(ToOwned::to_owned).collect(),
        }
    }

    /// Location the corpus was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Corpus lines without terminators.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` for an empty corpus.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
