//! Seed file writing.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{Span, field, instrument};

use crate::error::{Result, SenseDistError};
use crate::inventory::Sense;

/// Writes one definition per line, in ordinal order, truncating `path`.
///
/// Line breaks inside a definition become spaces so the file always holds
/// exactly one line per sense. The file is flushed before returning.
///
/// # Errors
/// Returns [`SenseDistError::Io`] when the file cannot be created or written.
///
/// # Examples
/// ```
/// use sensedist_core::{Sense, write_seed_file};
///
/// let dir = tempfile::tempdir().expect("temp dir");
/// let path = dir.path().join("bank.seed");
/// write_seed_file(&path, &Sense::enumerate(["sloping land", "a financial institution"]))
///     .expect("seed file must be written");
/// let text = std::fs::read_to_string(&path).expect("seed file must be readable");
/// assert_eq!(text, "sloping land\na financial institution\n");
/// ```
#[instrument(
    name = "seed.write",
    err,
    skip(senses),
    fields(path = %path.display(), senses = field::Empty),
)]
pub fn write_seed_file(path: &Path, senses: &[Sense]) -> Result<()> {
    Span::current().record("senses", senses.len());
    let io_error = |source| SenseDistError::io(path, source);
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    for sense in senses {
        writeln!(writer, "{}", single_line(sense.definition())).map_err(io_error)?;
    }
    writer.flush().map_err(io_error)?;
    writer
        .into_inner()
        .map_err(|err| io_error(err.into_error()))?
        .sync_all()
        .map_err(io_error)
}

fn single_line(definition: &str) -> String {
    definition
        .lines()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
