//! Scripted stand-in for the external `uwsd` classifier.
//!
//! The fake is a POSIX shell script that honours the `-train` and `-test`
//! argument forms. Training writes a placeholder model to the requested path;
//! testing prints a canned output file. Each invocation records its arguments
//! next to the script so tests can assert the command-line contract.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Builder for a fake classifier script.
///
/// # Examples
/// ```no_run
/// use sensedist_test_support::classifier::FakeClassifier;
///
/// let dir = tempfile::tempdir().expect("temp dir");
/// let fake = FakeClassifier::new()
///     .with_test_output("-1 1.0000\n2 0.4000\n")
///     .install(dir.path())
///     .expect("script must install");
/// assert!(fake.program().exists());
/// ```
#[derive(Debug, Clone)]
pub struct FakeClassifier {
    train_exit: i32,
    test_exit: i32,
    test_output: String,
    train_stdout: String,
    test_stderr: String,
    test_delay_secs: u32,
}

impl Default for FakeClassifier {
    fn default() -> Self {
        Self {
            train_exit: 0,
            test_exit: 0,
            test_output: String::new(),
            train_stdout: String::new(),
            test_stderr: String::new(),
            test_delay_secs: 0,
        }
    }
}

impl FakeClassifier {
    /// Creates a fake that succeeds in both phases with empty test output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the exit code of the training phase.
    #[must_use]
    pub fn with_train_exit(mut self, code: i32) -> Self {
        self.train_exit = code;
        self
    }

    /// Sets text printed to stdout by the training phase.
    #[must_use]
    pub fn with_train_stdout(mut self, text: impl Into<String>) -> Self {
        self.train_stdout = text.into();
        self
    }

    /// Sets the exit code of the test phase.
    #[must_use]
    pub fn with_test_exit(mut self, code: i32) -> Self {
        self.test_exit = code;
        self
    }

    /// Sets the stdout produced by the test phase.
    #[must_use]
    pub fn with_test_output(mut self, output: impl Into<String>) -> Self {
        self.test_output = output.into();
        self
    }

    /// Sets text printed to stderr by the test phase.
    #[must_use]
    pub fn with_test_stderr(mut self, text: impl Into<String>) -> Self {
        self.test_stderr = text.into();
        self
    }

    /// Makes the test phase sleep before answering.
    #[must_use]
    pub fn with_test_delay_secs(mut self, secs: u32) -> Self {
        self.test_delay_secs = secs;
        self
    }

    /// Writes the script and its canned outputs into `dir`.
    ///
    /// # Errors
    /// Returns an I/O error when a file cannot be written or made executable.
    pub fn install(&self, dir: &Path) -> io::Result<InstalledClassifier> {
        let program = dir.join("uwsd");
        let test_output = dir.join("uwsd.test-output");
        let train_stdout = dir.join("uwsd.train-stdout");
        let test_stderr = dir.join("uwsd.test-stderr");
        fs::write(&test_output, &self.test_output)?;
        fs::write(&train_stdout, &self.train_stdout)?;
        fs::write(&test_stderr, &self.test_stderr)?;

        let script = format!(
            r#"#!/bin/sh
mode="$1"
case "$mode" in
  -train)
    printf '%s\n' "$@" > "$0.train-args"
    printf 'decision list\n' > "$4"
    cat '{train_stdout}'
    exit {train_exit}
    ;;
  -test)
    printf '%s\n' "$@" > "$0.test-args"
    if [ {delay} -gt 0 ]; then sleep {delay}; fi
    cat '{test_stderr}' >&2
    cat '{test_output}'
    exit {test_exit}
    ;;
esac
echo "unknown mode $mode" >&2
exit 64
"#,
            train_stdout = train_stdout.display(),
            train_exit = self.train_exit,
            delay = self.test_delay_secs,
            test_stderr = test_stderr.display(),
            test_output = test_output.display(),
            test_exit = self.test_exit,
        );
        fs::write(&program, script)?;
        make_executable(&program)?;
        Ok(InstalledClassifier { program })
    }
}

/// A fake classifier written to disk.
#[derive(Debug, Clone)]
pub struct InstalledClassifier {
    program: PathBuf,
}

impl InstalledClassifier {
    /// Path of the executable script.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments of the last training invocation, if it ran.
    #[must_use]
    pub fn train_args(&self) -> Option<Vec<String>> {
        self.recorded_args("train-args")
    }

    /// Arguments of the last test invocation, if it ran.
    #[must_use]
    pub fn test_args(&self) -> Option<Vec<String>> {
        self.recorded_args("test-args")
    }

    fn recorded_args(&self, suffix: &str) -> Option<Vec<String>> {
        let mut path = self.program.clone().into_os_string();
        path.push(".");
        path.push(suffix);
        fs::read_to_string(PathBuf::from(path))
            .ok()
            .map(|text| text.lines().map(ToOwned::to_owned).collect())
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
