//! Output formatting and persistence for computed reports.
//!
//! Supports pretty-printing, JSON serialization, and CSV append of the
//! headline statistics.

use anyhow::Result;
use tracing::{debug, info};

use crate::analyzers::types::{AggregateResult, ReportSummary};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &AggregateResult) {
    info!("{:#?}", report);
}

/// Logs a report as pretty-printed JSON.
pub fn print_json(report: &AggregateResult) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Appends a [`ReportSummary`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &Path, summary: &ReportSummary) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}
