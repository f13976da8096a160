//! Parsing of classifier test output into per-line sense labels.
//!
//! Every output line answers one corpus line. A line starts with an integer
//! label token, optionally followed by score text: `-1` means the target word
//! was not found, `0` means the classifier could not decide, and `1..=N`
//! names a sense ordinal.

use std::num::NonZeroUsize;

use thiserror::Error;
use tracing::{Span, field, instrument};

use crate::error::{Result, SenseDistError};

/// Histogram bucket shared by every label without a sense.
pub const NOT_APPLICABLE_BUCKET: usize = 0;

/// Sense label assigned to one corpus line.
///
/// # Examples
/// ```
/// use sensedist_core::Label;
///
/// let label = Label::parse_token("2", 3).expect("2 is a valid sense");
/// assert_eq!(label.bucket(), 2);
/// assert_eq!(Label::parse_token("-1", 3).expect("valid").bucket(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// The target word does not occur on the line (`-1`).
    Absent,
    /// The word occurs but no rule fired (`0`).
    Undecided,
    /// The line was assigned this sense ordinal.
    Sense(NonZeroUsize),
}

/// Errors raised for an unusable label token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    /// The token is not an integer.
    #[error("label `{token}` is not an integer")]
    NotAnInteger {
        /// Offending token.
        token: String,
    },
    /// The integer does not name a sense.
    #[error("label {value} is outside -1..={sense_count}")]
    OutOfRange {
        /// Parsed value.
        value: i64,
        /// Number of senses in the inventory.
        sense_count: usize,
    },
}

impl Label {
    /// Parses a label token against an inventory of `sense_count` senses.
    ///
    /// # Errors
    /// Returns [`LabelError::NotAnInteger`] for non-numeric tokens and
    /// [`LabelError::OutOfRange`] for integers that name no sense.
    pub fn parse_token(token: &str, sense_count: usize) -> core::result::Result<Self, LabelError> {
        let value: i64 = token.parse().map_err(|_| LabelError::NotAnInteger {
            token: token.to_owned(),
        })?;
        match value {
            -1 => Ok(Self::Absent),
            0 => Ok(Self::Undecided),
            _ => usize::try_from(value)
                .ok()
                .filter(|ordinal| *ordinal <= sense_count)
                .and_then(NonZeroUsize::new)
                .map(Self::Sense)
                .ok_or(LabelError::OutOfRange { value, sense_count }),
        }
    }

    /// Histogram bucket for this label; both non-sense labels share
    /// [`NOT_APPLICABLE_BUCKET`].
    #[must_use]
    pub fn bucket(self) -> usize {
        match self {
            Self::Absent | Self::Undecided => NOT_APPLICABLE_BUCKET,
            Self::Sense(ordinal) => ordinal.get(),
        }
    }
}

/// Labels parsed from one classifier run, aligned with the output lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    labels: Vec<Option<Label>>,
}

impl Classification {
    /// Wraps an explicit label sequence; `None` marks a skipped line.
    #[must_use]
    pub fn from_labels(labels: Vec<Option<Label>>) -> Self {
        Self { labels }
    }

    /// Per-line labels; skipped lines are `None`.
    #[must_use]
    pub fn labels(&self) -> &[Option<Label>] {
        &self.labels
    }

    /// Label of output line `index` (zero-based), if it carried one.
    #[must_use]
    pub fn label(&self, index: usize) -> Option<Label> {
        self.labels.get(index).copied().flatten()
    }

    /// Number of lines that carried a label.
    #[must_use]
    pub fn labelled_lines(&self) -> usize {
        self.labels.iter().flatten().count()
    }

    /// Number of output lines, labelled or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` when the output had no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Parses the test-phase output against a corpus of `corpus_lines` lines and
/// an inventory of `sense_count` senses.
///
/// Lines of at most one character carry no label. The first
/// whitespace-delimited token of every other line must be a valid label.
///
/// # Errors
/// Returns [`SenseDistError::LineCountMismatch`] when the output does not
/// have one line per corpus line, and [`SenseDistError::Parse`] for the first
/// unusable label.
///
/// # Examples
/// ```
/// use sensedist_core::parse_output;
///
/// let classification = parse_output("-1 x\n2 y\n-1 z\n", 3, 2).expect("output is valid");
/// assert_eq!(classification.labelled_lines(), 3);
/// ```
#[instrument(
    name = "output.parse",
    err,
    skip(output),
    fields(output_lines = field::Empty, labelled = field::Empty),
)]
pub fn parse_output(
    output: &str,
    corpus_lines: usize,
    sense_count: usize,
) -> Result<Classification> {
    let lines: Vec<&str> = output.lines().collect();
    let span = Span::current();
    span.record("output_lines", lines.len());
    if lines.len() != corpus_lines {
        return Err(SenseDistError::LineCountMismatch {
            corpus: corpus_lines,
            output: lines.len(),
        });
    }

    let labels = lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            parse_line(line, sense_count).map_err(|source| SenseDistError::Parse {
                line: index + 1,
                source,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let classification = Classification::from_labels(labels);
    span.record("labelled", classification.labelled_lines());
    Ok(classification)
}

fn parse_line(line: &str, sense_count: usize) -> core::result::Result<Option<Label>, LabelError> {
    if line.chars().count() <= 1 {
        return Ok(None);
    }
    match line.split_whitespace().next() {
        Some(token) => Label::parse_token(token, sense_count).map(Some),
        None => Ok(None),
    }
}
