//! JSON output writer.

use std::fs::File;
use std::io::Write;

use crate::error::Result;
use crate::report::AnalysisReport;

/// Writes the whole report to a file as pretty-printed JSON.
pub fn write_json(report: &AnalysisReport, output_path: &str) -> Result<()> {
    let json = to_json(report)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts the whole report to a pretty-printed JSON string.
///
/// Same format as [`write_json`], but returns a String instead of writing to file.
pub fn to_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
