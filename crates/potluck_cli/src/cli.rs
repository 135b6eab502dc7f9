//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Potluck - incremental static site generator for recipe collections
#[derive(Parser)]
#[command(name = "potluck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the site
    Build {
        /// Source (Markdown) directory
        #[arg(short = 's', long = "source", value_name = "DIR")]
        source: Option<PathBuf>,

        /// Destination (HTML) directory
        #[arg(short = 'd', long = "dest", value_name = "DIR")]
        dest: Option<PathBuf>,

        /// Build cache file
        #[arg(short = 'c', long = "cache", value_name = "FILE")]
        cache: Option<PathBuf>,

        /// Ignore the build cache
        #[arg(long)]
        clean: bool,

        /// Summary format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
