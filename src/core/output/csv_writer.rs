//! CSV output writer.

use std::fs::File;
use std::io::Write;

use crate::error::Result;
use crate::report::AnalysisReport;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Writes the activity table of `report` to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `bucket_start`, `total`, then one column per author
///   (alphabetical)
/// - Rows: one per bucket of the zero-filled series
/// - Encoding: UTF-8
pub fn write_csv(report: &AnalysisReport, output_path: &str) -> Result<()> {
    let file = File::create(output_path)?;
    write_table(report, file)
}

/// Converts the activity table of `report` to a CSV string.
///
/// Same format as [`write_csv`].
pub fn to_csv(report: &AnalysisReport) -> Result<String> {
    let mut buffer = Vec::new();
    write_table(report, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_table<W: Write>(report: &AnalysisReport, out: W) -> Result<()> {
    let stats = &report.stats;
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(out);

    let authors: Vec<&String> = stats.author_time_series.keys().collect();

    let mut header = vec!["bucket_start", "total"];
    header.extend(authors.iter().map(|a| a.as_str()));
    writer.write_record(&header)?;

    for (i, point) in stats.time_series.iter().enumerate() {
        let mut record = Vec::with_capacity(authors.len() + 2);
        record.push(point.bucket_start.format(TIMESTAMP_FORMAT).to_string());
        record.push(point.value.to_string());
        for author in &authors {
            let value = stats.author_time_series[*author]
                .get(i)
                .map_or(0, |p| p.value);
            record.push(value.to_string());
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
