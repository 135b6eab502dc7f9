//! Potluck CLI
//!
//! Builds a recipe site from a directory of Markdown files.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{run_build, run_init};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if cli.quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Build {
            source,
            dest,
            cache,
            clean,
            format,
        } => run_build(
            cli,
            commands::BuildOverrides {
                source: source.clone(),
                dest: dest.clone(),
                cache: cache.clone(),
            },
            *clean,
            *format,
        ),
        Commands::Init { force } => run_init(cli, *force),
    }
}
