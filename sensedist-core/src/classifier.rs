//! Invocation of the external sense classifier.
//!
//! The classifier is an opaque executable with two modes:
//!
//! - `-train <corpus> <seed> <model> <word>` learns a decision list and
//!   writes it to `<model>`;
//! - `-test <model> <corpus> <word>` prints one `<label> <score>` line per
//!   corpus line on stdout.
//!
//! Both modes run through [`run_process`], which captures the exit status,
//! stdout and stderr, and enforces an optional timeout.

use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{Span, debug, field, instrument, warn};

use crate::error::{Result, SenseDistError};

/// Default location of the classifier executable.
pub const DEFAULT_CLASSIFIER: &str = "./uwsd";

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const DETAIL_LIMIT: usize = 512;

/// Classifier mode being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Decision-list training.
    Train,
    /// Labelling of the corpus.
    Test,
}

impl Phase {
    /// Command-line flag selecting this mode.
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Train => "-train",
            Self::Test => "-test",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Train => "training",
            Self::Test => "testing",
        })
    }
}

/// What to do when the training phase exits unsuccessfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrainFailurePolicy {
    /// Abort the run with [`SenseDistError::ClassifierFailed`].
    #[default]
    Abort,
    /// Log a warning with the exit status and continue to the test phase.
    Warn,
}

/// Captured result of a finished child process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit status of the child.
    pub status: ExitStatus,
    /// Everything written to stdout.
    pub stdout: Vec<u8>,
    /// Everything written to stderr.
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    /// Short human-readable digest of the child's diagnostics, preferring
    /// stderr and falling back to stdout.
    #[must_use]
    pub fn detail(&self) -> String {
        let stderr = String::from_utf8_lossy(&self.stderr);
        let text = if stderr.trim().is_empty() {
            String::from_utf8_lossy(&self.stdout)
        } else {
            stderr
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return "no diagnostic output".to_owned();
        }
        trimmed.chars().take(DETAIL_LIMIT).collect()
    }
}

/// Why [`run_process`] did not produce a [`ProcessOutput`].
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Spawning or waiting for the child failed.
    #[error("failed to run child process: {0}")]
    Io(#[source] io::Error),
    /// The child was killed after exceeding the timeout.
    #[error("child process exceeded its timeout and was killed")]
    TimedOut,
}

/// Runs `command` to completion with stdin closed, capturing both output
/// streams.
///
/// Output is drained on background threads so a child writing more than a
/// pipe buffer cannot stall. With a `timeout`, the child is killed once it
/// expires; reader threads still attached to surviving grandchildren are
/// detached rather than joined.
///
/// # Errors
/// Returns [`ProcessError::Io`] when the child cannot be spawned or waited
/// for, and [`ProcessError::TimedOut`] when the timeout expires.
pub fn run_process(
    mut command: Command,
    timeout: Option<Duration>,
) -> core::result::Result<ProcessOutput, ProcessError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = command.spawn().map_err(ProcessError::Io)?;
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match timeout {
        None => child.wait().map_err(ProcessError::Io)?,
        Some(limit) => match wait_until(&mut child, Instant::now() + limit)? {
            Some(status) => status,
            None => {
                // Killing fails only if the child already exited.
                let _ = child.kill();
                let _ = child.wait();
                return Err(ProcessError::TimedOut);
            }
        },
    };

    Ok(ProcessOutput {
        status,
        stdout: join(stdout).map_err(ProcessError::Io)?,
        stderr: join(stderr).map_err(ProcessError::Io)?,
    })
}

fn wait_until(
    child: &mut Child,
    deadline: Instant,
) -> core::result::Result<Option<ExitStatus>, ProcessError> {
    loop {
        if let Some(status) = child.try_wait().map_err(ProcessError::Io)? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

type Drain = Option<JoinHandle<io::Result<Vec<u8>>>>;

fn drain<R>(stream: Option<R>) -> Drain
where
    R: Read + Send + 'static,
{
    stream.map(|mut stream| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            stream.read_to_end(&mut buffer)?;
            Ok(buffer)
        })
    })
}

fn join(handle: Drain) -> io::Result<Vec<u8>> {
    match handle {
        None => Ok(Vec::new()),
        Some(handle) => handle
            .join()
            .map_err(|_| io::Error::other("output reader thread panicked"))?,
    }
}

/// The external classifier executable and its invocation policy.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use sensedist_core::{ExternalClassifier, TrainFailurePolicy};
///
/// let classifier = ExternalClassifier::new("./uwsd")
///     .with_timeout(Some(Duration::from_secs(60)))
///     .with_train_policy(TrainFailurePolicy::Warn);
/// assert_eq!(classifier.program().to_str(), Some("./uwsd"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalClassifier {
    program: PathBuf,
    timeout: Option<Duration>,
    train_policy: TrainFailurePolicy,
}

impl ExternalClassifier {
    /// Creates an invoker for `program` without a timeout, aborting on
    /// training failures.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
            train_policy: TrainFailurePolicy::default(),
        }
    }

    /// Bounds each invocation by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Selects how training failures are treated.
    #[must_use]
    pub fn with_train_policy(mut self, policy: TrainFailurePolicy) -> Self {
        self.train_policy = policy;
        self
    }

    /// Executable path.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Per-invocation timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Training failure policy.
    #[must_use]
    pub fn train_policy(&self) -> TrainFailurePolicy {
        self.train_policy
    }

    /// Trains a model for `word` from `corpus` and `seed`, writing it to
    /// `model`.
    ///
    /// # Errors
    /// Returns [`SenseDistError::ClassifierLaunch`] or
    /// [`SenseDistError::ClassifierTimeout`] when the process cannot run to
    /// completion, and [`SenseDistError::ClassifierFailed`] for a non-zero
    /// exit under [`TrainFailurePolicy::Abort`].
    #[instrument(
        name = "classifier.train",
        err,
        skip(self, corpus, seed, model),
        fields(program = %self.program.display(), exit_code = field::Empty),
    )]
    pub fn train(&self, word: &str, corpus: &Path, seed: &Path, model: &Path) -> Result<()> {
        let mut command = Command::new(&self.program);
        command
            .arg(Phase::Train.flag())
            .arg(corpus)
            .arg(seed)
            .arg(model)
            .arg(word);
        let output = self.execute(Phase::Train, command)?;
        if output.status.success() {
            return Ok(());
        }

        match self.train_policy {
            TrainFailurePolicy::Abort => Err(failure(Phase::Train, &output)),
            TrainFailurePolicy::Warn => {
                warn!(
                    exit_code = output.status.code(),
                    detail = output.detail().as_str(),
                    "classifier training failed; continuing with the existing model"
                );
                Ok(())
            }
        }
    }

    /// Labels every line of `corpus` with `model`, returning the raw stdout.
    ///
    /// # Errors
    /// Returns [`SenseDistError::ClassifierLaunch`],
    /// [`SenseDistError::ClassifierTimeout`] or
    /// [`SenseDistError::ClassifierFailed`]; a non-zero exit is always fatal.
    #[instrument(
        name = "classifier.test",
        err,
        skip(self, model, corpus),
        fields(program = %self.program.display(), exit_code = field::Empty, bytes = field::Empty),
    )]
    pub fn test(&self, word: &str, model: &Path, corpus: &Path) -> Result<Vec<u8>> {
        let mut command = Command::new(&self.program);
        command
            .arg(Phase::Test.flag())
            .arg(model)
            .arg(corpus)
            .arg(word);
        let output = self.execute(Phase::Test, command)?;
        if !output.status.success() {
            return Err(failure(Phase::Test, &output));
        }
        Span::current().record("bytes", output.stdout.len());
        Ok(output.stdout)
    }

    fn execute(&self, phase: Phase, command: Command) -> Result<ProcessOutput> {
        debug!(phase = %phase, command = ?command, "invoking classifier");
        let output = run_process(command, self.timeout).map_err(|error| match error {
            ProcessError::Io(source) => SenseDistError::ClassifierLaunch {
                phase,
                program: self.program.clone(),
                source,
            },
            ProcessError::TimedOut => SenseDistError::ClassifierTimeout {
                phase,
                timeout: self.timeout.unwrap_or_default(),
            },
        })?;
        if let Some(code) = output.status.code() {
            Span::current().record("exit_code", code);
        }
        Ok(output)
    }
}

fn failure(phase: Phase, output: &ProcessOutput) -> SenseDistError {
    SenseDistError::ClassifierFailed {
        phase,
        status: output.status,
        detail: output.detail(),
    }
}

#[cfg(test)]
mod tests;
