//! Error types raised while loading and aggregating the accident dataset.

use thiserror::Error;

/// Failures of the normalizer and the aggregation engine.
///
/// Every variant is fatal for the load or request that raised it; there is
/// no row-skip fallback.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("required column '{column}' not found in the dataset")]
    Schema { column: String },

    #[error("row {row}: cannot convert {field} value '{value}': {reason}")]
    Coercion {
        row: usize,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("row {row}: day-of-week code '{code}' has no day name (expected 1..=7)")]
    InvalidDayCode { row: usize, code: String },

    #[error("cannot compute {statistic} of an empty dataset")]
    EmptyDataset { statistic: &'static str },

    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),
}

impl ReportError {
    pub(crate) fn coercion(
        row: usize,
        field: &'static str,
        value: &str,
        reason: impl Into<String>,
    ) -> Self {
        ReportError::Coercion {
            row,
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
