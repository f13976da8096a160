//! CLI entry point for sensedist.
//!
//! Parses command-line arguments with clap, runs the disambiguation pipeline
//! with its transcript on stdout, renders the sense distribution, and maps
//! errors to exit codes: `2` for usage errors and a missing corpus, `1` for
//! every other failure. Logging is initialised first so the pipeline can emit
//! structured diagnostics via `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use sensedist_cli::{
    cli::{Cli, CliError, run_cli},
    logging::{self, LoggingError},
};
use sensedist_core::{SenseDistErrorCode, render_report};
use tracing::{error, field};

const EXIT_INPUT_NOT_FOUND: u8 = 2;

/// Parse CLI arguments, run the pipeline, render the report, and flush the
/// output stream.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    let summary = run_cli(&cli, &mut writer).context("failed to execute command")?;
    render_report(&mut writer, &summary, &cli.report_options())
        .context("failed to render report")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let core = err.downcast_ref::<CliError>().and_then(CliError::core);
        let code = core.map(|core| core.code());
        let inventory_code = core.and_then(|core| core.inventory_code());

        let code_field = code.map(|code| field::display(code.as_str()));
        let inventory_code_field = inventory_code.map(|code| field::display(code.as_str()));
        let message = format!("{err:#}");

        error!(
            error = %message,
            code = code_field,
            inventory_code = inventory_code_field,
            "command execution failed"
        );
        return match code {
            Some(SenseDistErrorCode::InputNotFound) => ExitCode::from(EXIT_INPUT_NOT_FOUND),
            _ => ExitCode::FAILURE,
        };
    }

    ExitCode::SUCCESS
}

// Tracing is not available yet, so this one diagnostic goes straight to stderr.
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
