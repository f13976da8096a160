//! Small helpers shared across CLI tests.
//!
//! The CLI unit tests assemble a scratch directory holding a corpus, a
//! miniature WordNet database and a fake classifier. These helpers keep the
//! test cases concise and consistent.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use super::{Cli, CliError, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_text_file(dir: &Path, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

pub(super) fn parse_cli(args: &[&str]) -> Cli {
    match Cli::try_parse_from(std::iter::once("sensedist").chain(args.iter().copied())) {
        Ok(cli) => cli,
        Err(err) => panic!("arguments {args:?} must parse: {err}"),
    }
}

pub(super) fn run_cli_expecting_error(cli: &Cli, panic_msg: &str) -> (CliError, String) {
    let mut console = Vec::new();
    match run_cli(cli, &mut console) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => (err, String::from_utf8_lossy(&console).into_owned()),
    }
}
