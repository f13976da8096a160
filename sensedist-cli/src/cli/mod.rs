//! Command-line interface orchestration for sensedist.
//!
//! A single command disambiguates one corpus: it resolves the target word and
//! the WordNet database, runs the pipeline, and hands the summary back for
//! rendering.

mod commands;

pub use commands::{Cli, CliError, WNSEARCHDIR_ENV, WORDNET_DIR_ENV, run_cli};

#[cfg(test)]
mod test_helpers;
