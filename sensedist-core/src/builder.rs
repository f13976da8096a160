//! Builder utilities for configuring a [`Disambiguator`].
//!
//! Collects the classifier location, the artifact directory and the
//! invocation policy, and validates them before a run can start.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::classifier::{DEFAULT_CLASSIFIER, ExternalClassifier, TrainFailurePolicy};
use crate::disambiguator::Disambiguator;
use crate::error::{Result, SenseDistError};

/// Configures and constructs [`Disambiguator`] instances.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use std::time::Duration;
/// use sensedist_core::{DisambiguatorBuilder, TrainFailurePolicy};
///
/// let disambiguator = DisambiguatorBuilder::new()
///     .with_classifier("/opt/uwsd/uwsd")
///     .with_output_dir("runs")
///     .with_timeout(Some(Duration::from_secs(300)))
///     .with_train_policy(TrainFailurePolicy::Warn)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(disambiguator.output_dir(), Path::new("runs"));
/// assert_eq!(disambiguator.classifier().timeout(), Some(Duration::from_secs(300)));
/// ```
#[derive(Debug, Clone)]
pub struct DisambiguatorBuilder {
    classifier: PathBuf,
    output_dir: PathBuf,
    timeout: Option<Duration>,
    train_policy: TrainFailurePolicy,
}

impl Default for DisambiguatorBuilder {
    fn default() -> Self {
        Self {
            classifier: PathBuf::from(DEFAULT_CLASSIFIER),
            output_dir: PathBuf::from("."),
            timeout: None,
            train_policy: TrainFailurePolicy::Abort,
        }
    }
}

impl DisambiguatorBuilder {
    /// Creates a builder using `./uwsd`, the current directory, no timeout
    /// and fatal training failures.
    ///
    /// # Examples
    /// ```
    /// use std::path::Path;
    /// use sensedist_core::DisambiguatorBuilder;
    ///
    /// let builder = DisambiguatorBuilder::new();
    /// assert_eq!(builder.classifier(), Path::new("./uwsd"));
    /// assert_eq!(builder.timeout(), None);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the classifier executable.
    #[must_use]
    pub fn with_classifier(mut self, program: impl Into<PathBuf>) -> Self {
        self.classifier = program.into();
        self
    }

    /// Returns the configured classifier executable.
    #[must_use]
    pub fn classifier(&self) -> &Path {
        &self.classifier
    }

    /// Overrides the directory receiving the seed, model and output files.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Returns the configured artifact directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Bounds every classifier invocation; `None` waits indefinitely.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Selects how a failing training phase is handled.
    #[must_use]
    pub fn with_train_policy(mut self, policy: TrainFailurePolicy) -> Self {
        self.train_policy = policy;
        self
    }

    /// Returns the training failure policy.
    #[must_use]
    pub fn train_policy(&self) -> TrainFailurePolicy {
        self.train_policy
    }

    /// Validates the configuration and constructs a [`Disambiguator`].
    ///
    /// # Errors
    /// Returns [`SenseDistError::EmptyClassifierPath`] when no executable is
    /// configured and [`SenseDistError::InvalidTimeout`] for a zero timeout.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use sensedist_core::{DisambiguatorBuilder, SenseDistErrorCode};
    ///
    /// let err = DisambiguatorBuilder::new()
    ///     .with_timeout(Some(Duration::ZERO))
    ///     .build()
    ///     .expect_err("zero timeout is rejected");
    /// assert_eq!(err.code(), SenseDistErrorCode::InvalidTimeout);
    /// ```
    pub fn build(self) -> Result<Disambiguator> {
        if self.classifier.as_os_str().is_empty() {
            return Err(SenseDistError::EmptyClassifierPath);
        }
        if self.timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(SenseDistError::InvalidTimeout);
        }

        let classifier = ExternalClassifier::new(self.classifier)
            .with_timeout(self.timeout)
            .with_train_policy(self.train_policy);
        Ok(Disambiguator::new(classifier, self.output_dir))
    }
}
