//! zipexport CLI - exports a project tree into a filtered ZIP archive.

mod cli;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use output::OutputFormatter;
use progress::ConsoleObserver;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match run(&cli, &*formatter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(&err);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout carries only progress lines or JSON.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &cli::Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let fallback_output = cli
        .output
        .clone()
        .unwrap_or_else(|| zipexport_core::config::DEFAULT_OUTPUT.into());
    let config = cli
        .export_config()
        .map_err(|e| error::convert_export_error(e, &fallback_output))?;

    tracing::debug!(
        include = config.include.len(),
        exclude = config.exclude.len(),
        level = config.compression_level,
        "resolved configuration"
    );

    // JSON mode keeps stdout for the final document only
    let mut observer = ConsoleObserver::new(cli.verbose, cli.quiet || cli.json);
    let report = zipexport_core::export_with_observer(&config, &mut observer)
        .map_err(|e| error::convert_export_error(e, &config.output))?;
    drop(observer);

    formatter.format_export_result(&config.output, &report)
}
