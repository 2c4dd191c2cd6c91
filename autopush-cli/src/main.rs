//! Binary crate for the `autopush` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Dispatching to the command handlers
//! - Mapping core error kinds to process exit codes

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();

    match cmd.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            let code = err
                .downcast_ref::<autopush_core::Error>()
                .map_or(1, autopush_core::Error::exit_code);
            ExitCode::from(code)
        }
    }
}
