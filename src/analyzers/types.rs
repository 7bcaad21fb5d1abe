//! Data types produced by the aggregation engine.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dataset::{DamageRange, DayOfWeek};

pub const HOURS_PER_DAY: usize = 24;

/// Count of records sharing one categorical label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

impl CategoryCount {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub day: DayOfWeek,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DamageCount {
    pub damage: DamageRange,
    pub count: usize,
}

/// Day × hour count matrix. Rows follow canonical day order, columns are
/// hours 0..=23.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourDayPivot {
    pub days: [DayOfWeek; 7],
    pub counts: [[usize; HOURS_PER_DAY]; 7],
}

impl Default for HourDayPivot {
    fn default() -> Self {
        Self {
            days: DayOfWeek::ALL,
            counts: [[0; HOURS_PER_DAY]; 7],
        }
    }
}

impl HourDayPivot {
    pub fn count(&self, day: DayOfWeek, hour: u8) -> usize {
        self.counts[day.index()][hour as usize]
    }

    pub fn row(&self, day: DayOfWeek) -> &[usize; HOURS_PER_DAY] {
        &self.counts[day.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Largest cell value, 0 for an all-zero pivot.
    pub fn max(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }
}

/// The full report payload: headline statistics plus six chart datasets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub total_accidents: usize,
    pub most_common_cause: String,
    pub most_frequent_weather: String,
    pub peak_hour: u8,
    pub most_frequent_day: DayOfWeek,
    pub most_common_damage: DamageRange,

    pub hourly_histogram: [usize; HOURS_PER_DAY],
    pub top_causes: Vec<CategoryCount>,
    pub weather_distribution: Vec<CategoryCount>,
    pub day_of_week_counts: Vec<DayCount>,
    pub hour_day_pivot: HourDayPivot,
    pub damage_distribution: Vec<DamageCount>,
}

impl AggregateResult {
    /// Flattens the headline statistics into a single CSV-friendly row.
    pub fn summary(&self, generated_at: DateTime<Utc>) -> ReportSummary {
        ReportSummary {
            generated_at,
            total_accidents: self.total_accidents,
            most_common_cause: self.most_common_cause.clone(),
            most_frequent_weather: self.most_frequent_weather.clone(),
            peak_hour: self.peak_hour,
            most_frequent_day: self.most_frequent_day.name().to_string(),
            most_common_damage: self.most_common_damage.label().to_string(),
        }
    }
}

/// Headline statistics of one report run, appended to the summary log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub generated_at: DateTime<Utc>,
    pub total_accidents: usize,
    pub most_common_cause: String,
    pub most_frequent_weather: String,
    pub peak_hour: u8,
    pub most_frequent_day: String,
    pub most_common_damage: String,
}
