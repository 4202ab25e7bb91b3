//! Output format writers.
//!
//! - [`write_json`] / [`to_json`] - the whole [`AnalysisReport`] as pretty JSON - requires `json-output` feature
//! - [`write_csv`] / [`to_csv`] - the bucketed activity table, semicolon delimited - requires `csv-output` feature
//!
//! # Choosing a Format
//!
//! | Format | Contents | Use Case |
//! |--------|----------|----------|
//! | JSON | Every section of the report | Dashboards, APIs |
//! | CSV | `bucket_start;total;<author>…` | Spreadsheets, plotting |
//!
//! [`AnalysisReport`]: crate::report::AnalysisReport
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> chatmetrics::Result<()> {
//! use chatmetrics::core::output::{to_csv, write_json};
//! use chatmetrics::core::Filter;
//! use chatmetrics::report::Analyzer;
//! use chatmetrics::session::Snapshot;
//!
//! let snapshot = Snapshot::from(chatmetrics::parse("01/01/24, 09:00 - Alice: ciao")?);
//! let report = Analyzer::bundled(chatmetrics::config::Language::English)?.analyze(&snapshot, &Filter::new())?;
//!
//! write_json(&report, "report.json")?;
//! let table = to_csv(&report)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
