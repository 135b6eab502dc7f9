//! Build command implementation

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use tracing::{debug, info};
use potluck_core::{SiteBuilder, SiteConfig};

use crate::cli::{Cli, OutputFormat};
use crate::output::output_report;

/// Paths given on the command line, taking precedence over the config file.
#[derive(Debug, Default)]
pub struct BuildOverrides {
    pub source: Option<PathBuf>,
    pub dest: Option<PathBuf>,
    pub cache: Option<PathBuf>,
}

pub fn run_build(cli: &Cli, overrides: BuildOverrides, clean: bool, format: OutputFormat) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    let cwd = std::env::current_dir().into_diagnostic()?;

    if let Some(source) = overrides.source {
        config.source_dir = cwd.join(source);
    }
    if let Some(dest) = overrides.dest {
        config.output_dir = cwd.join(dest);
    }
    if let Some(cache) = overrides.cache {
        config.cache_file = cwd.join(cache);
    }

    debug!(
        "Building {} into {}",
        config.source_path().display(),
        config.output_path().display()
    );

    let report = SiteBuilder::new(config)
        .clean(clean)
        .build()
        .into_diagnostic()?;

    output_report(&report, format, cli.quiet)
}

/// Loads the config named on the command line, or the one found in the
/// current directory, or the defaults.
fn load_config(path: Option<&Path>) -> Result<SiteConfig> {
    if let Some(path) = path {
        return SiteConfig::from_file(path).into_diagnostic();
    }

    match SiteConfig::discover(".") {
        Some(path) => {
            info!("Using config {}", path.display());
            SiteConfig::from_file(path).into_diagnostic()
        }
        None => {
            debug!("No config file found, using defaults");
            Ok(SiteConfig::new())
        }
    }
}
