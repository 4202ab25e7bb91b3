//! Output format selection.
//!
//! Library-first format type: it works without the CLI feature, and the CLI
//! reuses it directly as a `clap` value.
//!
//! # Example
//!
//! ```rust
//! use chatmetrics::format::OutputFormat;
//!
//! let format = OutputFormat::from_path("report.csv").unwrap();
//! assert_eq!(format, OutputFormat::Csv);
//! assert_eq!(format.extension(), "csv");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, Result};
use crate::report::AnalysisReport;

/// Output format for an analysis report.
///
/// - [`Json`](OutputFormat::Json) - every section of the report
/// - [`Csv`](OutputFormat::Csv) - the bucketed activity table only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Pretty-printed JSON of the whole report (default)
    #[default]
    Json,

    /// Semicolon-delimited activity table
    Csv,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["json", "csv"]
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Csv => "text/csv",
        }
    }

    /// Detects format from a file path based on extension.
    pub fn from_path(path: &str) -> Result<Self> {
        let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();
        ext.parse().map_err(|_| {
            AnalyzerError::configuration(
                "output format",
                format!("Unknown file extension: '.{ext}'. Expected one of: json, csv"),
            )
        })
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

#[cfg(not(all(feature = "json-output", feature = "csv-output")))]
fn missing_feature(format: OutputFormat) -> AnalyzerError {
    let feature = match format {
        OutputFormat::Json => "json-output",
        OutputFormat::Csv => "csv-output",
    };
    AnalyzerError::configuration(
        "output format",
        format!("Output format {format} requires the '{feature}' feature to be enabled"),
    )
}

/// Writes `report` to `path` in the given format.
///
/// # Errors
///
/// Returns an error if the format's feature is disabled or the file cannot
/// be written.
#[cfg_attr(
    not(all(feature = "json-output", feature = "csv-output")),
    allow(unused_variables)
)]
pub fn write_to_format(report: &AnalysisReport, path: &str, format: OutputFormat) -> Result<()> {
    match format {
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(report, path),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(report, path),
        #[cfg(not(all(feature = "json-output", feature = "csv-output")))]
        _ => Err(missing_feature(format)),
    }
}

/// Renders `report` as a string in the given format.
///
/// # Errors
///
/// Returns an error if the format's feature is disabled or serialization fails.
#[cfg_attr(
    not(all(feature = "json-output", feature = "csv-output")),
    allow(unused_variables)
)]
pub fn to_format_string(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::to_json(report),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(report),
        #[cfg(not(all(feature = "json-output", feature = "csv-output")))]
        _ => Err(missing_feature(format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("csv").unwrap(), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("jsonl").is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path("out.csv").unwrap(), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_path("/tmp/Report.JSON").unwrap(),
            OutputFormat::Json
        );
        let err = OutputFormat::from_path("report.txt").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
        assert_eq!(OutputFormat::Csv.to_string(), "CSV");
        assert_eq!(OutputFormat::Json.mime_type(), "application/json");
        assert_eq!(serde_json::to_string(&OutputFormat::Csv).unwrap(), "\"csv\"");
    }

    fn sample_report() -> AnalysisReport {
        use crate::Message;
        use crate::config::Language;
        use crate::core::filter::Filter;
        use crate::report::Analyzer;
        use crate::session::Snapshot;
        use chrono::{TimeZone, Utc};

        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let snapshot = Snapshot::from(vec![Message::new("Alice", "hi", ts)]);
        Analyzer::bundled(Language::English)
            .unwrap()
            .analyze(&snapshot, &Filter::new())
            .unwrap()
    }

    #[cfg(all(feature = "csv-output", feature = "json-output"))]
    #[test]
    fn test_to_format_string() {
        let report = sample_report();

        let csv = to_format_string(&report, OutputFormat::Csv).unwrap();
        assert!(csv.starts_with("bucket_start;total;Alice"));
        let json = to_format_string(&report, OutputFormat::Json).unwrap();
        assert!(json.trim_start().starts_with('{'));
    }

    #[cfg(not(feature = "json-output"))]
    #[test]
    fn test_disabled_json_is_configuration_error() {
        let err = to_format_string(&sample_report(), OutputFormat::Json).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("json-output"));
    }

    #[cfg(not(feature = "csv-output"))]
    #[test]
    fn test_disabled_csv_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let err = write_to_format(&sample_report(), path.to_str().unwrap(), OutputFormat::Csv)
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(!path.exists());
    }
}
