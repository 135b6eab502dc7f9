//! Output formatting module

mod json;
mod text;

use miette::Result;
use potluck_core::BuildReport;

use crate::cli::OutputFormat;

pub fn output_report(report: &BuildReport, format: OutputFormat, quiet: bool) -> Result<()> {
    match format {
        OutputFormat::Json => json::output_json(report)?,
        OutputFormat::Text if !quiet => text::output_text(report),
        OutputFormat::Text => {}
    }

    Ok(())
}
