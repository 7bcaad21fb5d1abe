//! CSV ingestion: header check, row deserialization and normalization.

use std::io::Read;

use anyhow::Result;
use tracing::info;

use crate::dataset::Dataset;
use crate::error::ReportError;
use crate::fetch::read_source;
use crate::normalize::{RawAccidentRow, check_headers, normalize_row};

/// Parses CSV data into a [`Dataset`].
///
/// The header row is validated before any data row is read. The first row
/// that fails to deserialize or normalize aborts the load.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Dataset, ReportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    check_headers(rdr.headers()?)?;

    let mut records = Vec::new();
    for (i, result) in rdr.deserialize::<RawAccidentRow>().enumerate() {
        let raw = result?;
        records.push(normalize_row(i + 1, raw)?);
    }

    Ok(Dataset::new(records))
}

/// Reads and normalizes the dataset at `source` (path, `.gz` path, or URL).
#[tracing::instrument]
pub async fn load_dataset(source: &str) -> Result<Dataset> {
    let bytes = read_source(source).await?;
    let dataset = load_from_reader(bytes.as_slice())?;
    info!(records = dataset.len(), "Dataset loaded");
    Ok(dataset)
}
