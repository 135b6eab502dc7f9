//! JSON output formatter

use miette::{IntoDiagnostic, Result};
use potluck_core::BuildReport;

pub fn output_json(report: &BuildReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report).into_diagnostic()?);
    Ok(())
}
