//! Run orchestration: inventory lookup, seed generation, classifier training
//! and testing, and output parsing, in that order.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{Span, field, instrument, warn};

use crate::artifacts::RunArtifacts;
use crate::classifier::ExternalClassifier;
use crate::corpus::Corpus;
use crate::error::{Result, SenseDistError};
use crate::inventory::SenseInventory;
use crate::labels::parse_output;
use crate::report::{SEPARATOR, write_phase_done, write_phase_start, write_sense_listing};
use crate::seed::write_seed_file;
use crate::summary::RunSummary;

/// Entry point for disambiguating a corpus against a sense inventory.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use sensedist_core::{DisambiguatorBuilder, SenseDistError, StaticInventory};
///
/// let disambiguator = DisambiguatorBuilder::new().build().expect("defaults are valid");
/// let inventory = StaticInventory::new("WordNet").with_word("bank", ["sloping land"]);
/// let mut console = Vec::new();
/// let err = disambiguator
///     .run(Path::new("no/such/corpus"), "bank", &inventory, &mut console)
///     .expect_err("missing corpus must fail");
/// assert!(matches!(err, SenseDistError::InputNotFound { .. }));
/// assert!(console.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Disambiguator {
    classifier: ExternalClassifier,
    output_dir: PathBuf,
}

impl Disambiguator {
    pub(crate) fn new(classifier: ExternalClassifier, output_dir: PathBuf) -> Self {
        Self {
            classifier,
            output_dir,
        }
    }

    /// Classifier invoker used for both phases.
    #[must_use]
    pub fn classifier(&self) -> &ExternalClassifier {
        &self.classifier
    }

    /// Directory receiving the run's artifacts.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Disambiguates every line of the corpus at `corpus_path` for `word`,
    /// writing the run transcript to `console`.
    ///
    /// The corpus is checked before anything is written. On success the seed
    /// file, the model and the raw classifier output exist in the output
    /// directory; a failing test phase leaves no output file behind.
    ///
    /// # Errors
    /// Returns [`SenseDistError::InputNotFound`] for a missing corpus,
    /// [`SenseDistError::InvalidWord`] when `word` cannot name the artifacts,
    /// and propagates inventory, I/O, classifier and parse failures.
    #[instrument(
        name = "pipeline.run",
        err,
        skip(self, corpus_path, inventory, console),
        fields(
            corpus = %corpus_path.display(),
            senses = field::Empty,
            labelled = field::Empty,
        ),
    )]
    pub fn run<I, W>(
        &self,
        corpus_path: &Path,
        word: &str,
        inventory: &I,
        console: &mut W,
    ) -> Result<RunSummary>
    where
        I: SenseInventory + ?Sized,
        W: Write + ?Sized,
    {
        let corpus = Corpus::read(corpus_path)?;
        let artifacts = RunArtifacts::new(&self.output_dir, word)?;
        let span = Span::current();

        let senses = inventory.noun_senses(word)?;
        span.record("senses", senses.len());
        write_sense_listing(console, word, inventory.name(), &senses)
            .map_err(SenseDistError::Console)?;
        if senses.len() < 2 {
            warn!(
                senses = senses.len(),
                "fewer than two senses; the distribution will not discriminate"
            );
        }

        let started = start_phase(console, "Generating seeds")?;
        write_seed_file(artifacts.seed(), &senses)?;
        finish_phase(console, started)?;

        let started = start_phase(console, "Training classifier")?;
        self.classifier
            .train(word, corpus_path, artifacts.seed(), artifacts.model())?;
        finish_phase(console, started)?;

        let started = start_phase(console, "Classifying text")?;
        let output = self
            .classifier
            .test(word, artifacts.model(), corpus_path)?;
        fs::write(artifacts.output(), &output)
            .map_err(|source| SenseDistError::io(artifacts.output(), source))?;
        finish_phase(console, started)?;
        writeln!(console, "{SEPARATOR}").map_err(SenseDistError::Console)?;

        let classification = parse_output(
            &String::from_utf8_lossy(&output),
            corpus.len(),
            senses.len(),
        )?;
        span.record("labelled", classification.labelled_lines());
        Ok(RunSummary::new(
            word.to_owned(),
            senses,
            corpus,
            classification,
            artifacts,
        ))
    }
}

fn start_phase<W: Write + ?Sized>(console: &mut W, label: &str) -> Result<Instant> {
    write_phase_start(console, label).map_err(SenseDistError::Console)?;
    Ok(Instant::now())
}

fn finish_phase<W: Write + ?Sized>(console: &mut W, started: Instant) -> Result<()> {
    write_phase_done(console, started.elapsed()).map_err(SenseDistError::Console)
}
