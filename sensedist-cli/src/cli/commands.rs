//! Argument parsing and command execution for the sensedist CLI.

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use sensedist_core::{
    DEFAULT_CLASSIFIER, DEFAULT_DATABASE_DIR, DisambiguatorBuilder, ReportOptions, RunSummary,
    SenseDistError, TrainFailurePolicy, WordNetInventory,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Environment variable naming the WordNet database directory.
pub const WORDNET_DIR_ENV: &str = "SENSEDIST_WORDNET_DIR";
/// Search directory variable honoured by the WordNet tools themselves.
pub const WNSEARCHDIR_ENV: &str = "WNSEARCHDIR";

/// Command-line options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "sensedist",
    about = "Estimate how often each WordNet sense of a word occurs in a corpus."
)]
pub struct Cli {
    /// Corpus file with one context per line; its file name is the word to
    /// disambiguate.
    pub word: PathBuf,

    /// Word to look up instead of the corpus file name.
    #[arg(long)]
    pub lemma: Option<String>,

    /// Path to the `uwsd` classifier executable.
    #[arg(long, default_value = DEFAULT_CLASSIFIER)]
    pub classifier: PathBuf,

    /// WordNet database directory [default: $SENSEDIST_WORDNET_DIR, then
    /// $WNSEARCHDIR, then /usr/share/wordnet].
    #[arg(long)]
    pub wordnet_dir: Option<PathBuf>,

    /// Directory receiving the seed, model and output files.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Kill the classifier if a phase runs longer than this many seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Continue with a warning when classifier training fails.
    #[arg(long)]
    pub lenient_train: bool,

    /// Show example lines for this many of the largest buckets.
    #[arg(long, default_value_t = 0)]
    pub examples: usize,

    /// Maximum example lines shown per bucket.
    #[arg(long, default_value_t = 3)]
    pub examples_per_sense: usize,
}

impl Cli {
    /// Report extras selected on the command line.
    #[must_use]
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions::default()
            .with_examples(self.examples)
            .with_examples_per_sense(self.examples_per_sense)
    }
}

/// Errors surfaced while executing the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// No word could be derived from the corpus path.
    #[error("cannot derive a word from `{}`; pass --lemma", path.display())]
    UnderivableWord {
        /// Corpus path supplied on the command line.
        path: PathBuf,
    },
    /// An environment variable contained invalid UTF-8 data.
    #[error("environment variable `{name}` contained invalid UTF-8: {source}")]
    InvalidUnicode {
        /// Name of the offending environment variable.
        name: &'static str,
        /// Underlying lookup failure.
        #[source]
        source: env::VarError,
    },
    /// Core orchestration failed.
    #[error(transparent)]
    Core(#[from] SenseDistError),
}

impl CliError {
    /// The core error behind this failure, if any.
    #[must_use]
    pub fn core(&self) -> Option<&SenseDistError> {
        match self {
            Self::Core(core) => Some(core),
            _ => None,
        }
    }
}

/// Executes one disambiguation run described by `cli`, writing the run
/// transcript to `console`.
///
/// The corpus is checked before the WordNet database is opened, so a corpus
/// path that is missing or not a regular file is reported as such and leaves
/// no files behind.
///
/// # Errors
/// Returns [`CliError`] when configuration or any pipeline phase fails.
#[instrument(
    name = "cli.run",
    err,
    skip(cli, console),
    fields(corpus = field::Empty, word = field::Empty, wordnet_dir = field::Empty),
)]
pub fn run_cli<W: Write + ?Sized>(cli: &Cli, console: &mut W) -> Result<RunSummary, CliError> {
    let span = Span::current();
    span.record("corpus", field::display(cli.word.display()));
    if !cli.word.is_file() {
        return Err(SenseDistError::InputNotFound {
            path: cli.word.clone(),
        }
        .into());
    }

    let word = derive_target_word(&cli.word, cli.lemma.as_deref())?;
    span.record("word", field::display(&word));
    let disambiguator = DisambiguatorBuilder::new()
        .with_classifier(&cli.classifier)
        .with_output_dir(&cli.output_dir)
        .with_timeout(cli.timeout_secs.map(Duration::from_secs))
        .with_train_policy(if cli.lenient_train {
            TrainFailurePolicy::Warn
        } else {
            TrainFailurePolicy::Abort
        })
        .build()?;

    let wordnet_dir = resolve_wordnet_dir(cli.wordnet_dir.as_deref(), |name| env::var(name))?;
    span.record("wordnet_dir", field::display(wordnet_dir.display()));
    let inventory = WordNetInventory::open(&wordnet_dir).map_err(SenseDistError::from)?;

    let summary = disambiguator.run(&cli.word, &word, &inventory, console)?;
    info!(
        word = summary.word(),
        senses = summary.senses().len(),
        labelled = summary.histogram().total(),
        "run completed"
    );
    Ok(summary)
}

/// Picks the word to disambiguate: the override when given, else the corpus
/// file name.
pub(super) fn derive_target_word(
    path: &Path,
    override_word: Option<&str>,
) -> Result<String, CliError> {
    if let Some(word) = override_word {
        return Ok(word.to_owned());
    }

    path.file_name()
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
        .ok_or_else(|| CliError::UnderivableWord {
            path: path.to_path_buf(),
        })
}

/// Resolves the WordNet directory from the flag, then the environment, then
/// the conventional install location. Empty variables are ignored.
pub(super) fn resolve_wordnet_dir<F>(flag: Option<&Path>, lookup: F) -> Result<PathBuf, CliError>
where
    F: Fn(&'static str) -> Result<String, env::VarError>,
{
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }

    for name in [WORDNET_DIR_ENV, WNSEARCHDIR_ENV] {
        match lookup(name) {
            Ok(value) if !value.trim().is_empty() => return Ok(PathBuf::from(value)),
            Ok(_) | Err(env::VarError::NotPresent) => {}
            Err(err @ env::VarError::NotUnicode(_)) => {
                return Err(CliError::InvalidUnicode { name, source: err });
            }
        }
    }
    Ok(PathBuf::from(DEFAULT_DATABASE_DIR))
}
