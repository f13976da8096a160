//! Error types for the sensedist core library.
//!
//! Defines the error enums exposed by the public API, their stable
//! machine-readable codes, and a convenient result alias.

use std::{io, path::PathBuf, process::ExitStatus, time::Duration};

use thiserror::Error;

use crate::classifier::Phase;
use crate::inventory::InventoryError;
use crate::labels::LabelError;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl ::core::fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

pub(crate) use define_error_codes;

/// Error type produced when configuring or running a
/// [`crate::Disambiguator`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SenseDistError {
    /// The corpus file does not exist.
    #[error("the input file `{}` does not exist", path.display())]
    InputNotFound {
        /// Path that was checked.
        path: PathBuf,
    },
    /// The target word cannot be used to name the run's artifacts.
    #[error("`{word}` is not a usable target word: {reason}")]
    InvalidWord {
        /// The rejected word.
        word: String,
        /// Why the word was rejected.
        reason: &'static str,
    },
    /// A zero-length timeout was configured.
    #[error("classifier timeout must be greater than zero")]
    InvalidTimeout,
    /// No classifier executable was configured.
    #[error("classifier executable path must not be empty")]
    EmptyClassifierPath,
    /// The sense inventory lookup failed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    /// Reading the corpus or writing an artifact failed.
    #[error("I/O error on `{}`: {source}", path.display())]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The classifier executable could not be started.
    #[error("failed to launch classifier `{}` for {phase}: {source}", program.display())]
    ClassifierLaunch {
        /// Phase being executed.
        phase: Phase,
        /// Executable that failed to start.
        program: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The classifier exited unsuccessfully.
    #[error("classifier {phase} exited with {status}: {detail}")]
    ClassifierFailed {
        /// Phase being executed.
        phase: Phase,
        /// Exit status reported by the operating system.
        status: ExitStatus,
        /// Trimmed diagnostic output captured from the child.
        detail: String,
    },
    /// The classifier did not finish within the configured timeout.
    #[error("classifier {phase} did not finish within {timeout:?}")]
    ClassifierTimeout {
        /// Phase being executed.
        phase: Phase,
        /// Configured limit.
        timeout: Duration,
    },
    /// A classifier output line carried an unusable label.
    #[error("classifier output line {line}: {source}")]
    Parse {
        /// One-based output line number.
        line: usize,
        /// Underlying label error.
        #[source]
        source: LabelError,
    },
    /// Writing the run transcript to the console failed.
    #[error("failed to write to the console: {0}")]
    Console(#[source] io::Error),
    /// The classifier produced a different number of lines than the corpus.
    #[error("classifier produced {output} lines for a corpus of {corpus} lines")]
    LineCountMismatch {
        /// Number of corpus lines.
        corpus: usize,
        /// Number of classifier output lines.
        output: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`SenseDistError`] variants.
    enum SenseDistErrorCode for SenseDistError {
        /// The corpus file does not exist.
        InputNotFound => InputNotFound { .. } => "SENSEDIST_INPUT_NOT_FOUND",
        /// The target word cannot be used to name the run's artifacts.
        InvalidWord => InvalidWord { .. } => "SENSEDIST_INVALID_WORD",
        /// A zero-length timeout was configured.
        InvalidTimeout => InvalidTimeout => "SENSEDIST_INVALID_TIMEOUT",
        /// No classifier executable was configured.
        EmptyClassifierPath => EmptyClassifierPath => "SENSEDIST_EMPTY_CLASSIFIER_PATH",
        /// The sense inventory lookup failed.
        Inventory => Inventory(..) => "SENSEDIST_INVENTORY_FAILURE",
        /// Reading the corpus or writing an artifact failed.
        Io => Io { .. } => "SENSEDIST_IO",
        /// The classifier executable could not be started.
        ClassifierLaunch => ClassifierLaunch { .. } => "SENSEDIST_CLASSIFIER_LAUNCH",
        /// The classifier exited unsuccessfully.
        ClassifierFailed => ClassifierFailed { .. } => "SENSEDIST_CLASSIFIER_FAILED",
        /// The classifier did not finish within the configured timeout.
        ClassifierTimeout => ClassifierTimeout { .. } => "SENSEDIST_CLASSIFIER_TIMEOUT",
        /// A classifier output line carried an unusable label.
        Parse => Parse { .. } => "SENSEDIST_PARSE",
        /// Writing the run transcript to the console failed.
        Console => Console(..) => "SENSEDIST_CONSOLE",
        /// The classifier produced a different number of lines than the corpus.
        LineCountMismatch => LineCountMismatch { .. } => "SENSEDIST_LINE_COUNT_MISMATCH",
    }
}

impl SenseDistError {
    /// Retrieve the inner [`crate::InventoryErrorCode`] when the error
    /// originated in the sense inventory.
    pub const fn inventory_code(&self) -> Option<crate::InventoryErrorCode> {
        match self {
            Self::Inventory(error) => Some(error.code()),
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, SenseDistError>;
