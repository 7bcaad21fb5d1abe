//! Accident aggregation.
//!
//! This module counts, ranks, bins and pivots the normalized records into
//! the headline statistics and the six chart datasets of the report.

pub mod aggregate;
pub mod types;
pub mod utility;
pub mod weather;
