//! Turns an [`AggregateResult`] into chart images and the report page.

pub mod charts;

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::analyzers::types::AggregateResult;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/// The six rendered charts as inline SVG documents.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSet {
    pub hourly_histogram: String,
    pub top_causes: String,
    pub weather_distribution: String,
    pub day_of_week: String,
    pub hour_day_heatmap: String,
    pub damage_distribution: String,
}

impl ChartSet {
    pub fn render(report: &AggregateResult) -> Result<Self> {
        Ok(Self {
            hourly_histogram: charts::hourly_histogram_chart(&report.hourly_histogram)?,
            top_causes: charts::top_causes_chart(&report.top_causes)?,
            weather_distribution: charts::weather_pie_chart(&report.weather_distribution)?,
            day_of_week: charts::day_of_week_chart(&report.day_of_week_counts)?,
            hour_day_heatmap: charts::hour_day_heatmap(&report.hour_day_pivot)?,
            damage_distribution: charts::damage_chart(&report.damage_distribution)?,
        })
    }
}

/// Renders the full HTML report page for `report`.
#[tracing::instrument(skip_all, fields(total = report.total_accidents))]
pub fn render_page(report: &AggregateResult) -> Result<String> {
    let charts = ChartSet::render(report)?;

    let mut context = Context::new();
    context.insert("report", report);
    context.insert("charts", &charts);

    Ok(Tera::one_off(INDEX_TEMPLATE, &context, true)?)
}
