//! Solbuild CLI
//!
//! Entry point for the solbuild command-line application.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use solbuild::cli::output::{display_error, OutputConfig};
use solbuild::cli::Cli;

fn main() {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Apply output configuration globally
    let output_config = OutputConfig::new(cli.quiet, cli.json, cli.verbose);
    output_config.apply_global();

    let code = match cli.run() {
        Ok(code) => code,
        Err(e) => {
            display_error(&e);
            1
        }
    };
    std::process::exit(code);
}
