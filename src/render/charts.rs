//! SVG chart rendering for the six report datasets.

use std::f64::consts::PI;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};

use crate::analyzers::types::{
    CategoryCount, DamageCount, DayCount, HOURS_PER_DAY, HourDayPivot,
};
use crate::analyzers::utility::{pct, share};
use crate::dataset::DayOfWeek;

pub const CHART_SIZE: (u32, u32) = (960, 520);

const HISTOGRAM_COLOR: RGBColor = RGBColor(31, 119, 180);

// viridis-ish, dark to light
const RANK_PALETTE: [RGBColor; 10] = [
    RGBColor(68, 1, 84),
    RGBColor(72, 40, 120),
    RGBColor(62, 74, 137),
    RGBColor(49, 104, 142),
    RGBColor(38, 130, 142),
    RGBColor(31, 158, 137),
    RGBColor(53, 183, 121),
    RGBColor(110, 206, 88),
    RGBColor(181, 222, 43),
    RGBColor(253, 231, 37),
];

const PASTEL_PALETTE: [RGBColor; 10] = [
    RGBColor(161, 201, 244),
    RGBColor(255, 180, 130),
    RGBColor(141, 229, 161),
    RGBColor(255, 159, 155),
    RGBColor(208, 187, 255),
    RGBColor(222, 187, 155),
    RGBColor(250, 176, 228),
    RGBColor(207, 207, 207),
    RGBColor(255, 254, 163),
    RGBColor(185, 242, 240),
];

// Monday..Sunday, cool to warm
const WEEK_PALETTE: [RGBColor; 7] = [
    RGBColor(59, 76, 192),
    RGBColor(98, 130, 234),
    RGBColor(141, 176, 254),
    RGBColor(184, 208, 249),
    RGBColor(245, 196, 173),
    RGBColor(244, 154, 123),
    RGBColor(180, 4, 38),
];

const DAMAGE_PALETTE: [RGBColor; 3] = [
    RGBColor(246, 180, 143),
    RGBColor(225, 51, 66),
    RGBColor(76, 29, 75),
];

const HEAT_LOW: RGBColor = RGBColor(255, 255, 217);
const HEAT_HIGH: RGBColor = RGBColor(8, 29, 88);

/// Weather slice pulled out of the pie.
const HIGHLIGHT_WEATHER: &str = "CLEAR";

fn title_font() -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, 24.0, FontStyle::Normal)
}

fn label_font() -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, 14.0, FontStyle::Normal)
}

fn render_svg<F>(draw: F) -> Result<String>
where
    F: for<'a> FnOnce(&DrawingArea<SVGBackend<'a>, Shift>) -> Result<()>,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    Ok(svg)
}

/// Headroom above the tallest bar.
fn axis_top(max: usize) -> u32 {
    let max = max.max(1) as u32;
    max + max / 10 + 1
}

fn segment_label(value: &SegmentValue<u32>, name: impl Fn(usize) -> String) -> String {
    match value {
        SegmentValue::CenterOf(i) => name(*i as usize),
        _ => String::new(),
    }
}

/// Hour axis with each bar centred on its hour.
const HOUR_AXIS: (f64, f64) = (-0.5, HOURS_PER_DAY as f64 - 0.5);

/// Sample points on the density curve drawn over the hourly histogram.
const KDE_STEPS: usize = 200;

/// Gaussian kernel density estimate of the hour-of-day distribution, sampled
/// at `steps` points across the hour axis.
///
/// The bandwidth follows Scott's rule (sample standard deviation times
/// `n^(-1/5)`). The density is scaled by the record count so the curve sits
/// on the same axis as the one-hour-wide bars. Empty when there are fewer
/// than two records or all of them fall in the same hour.
pub fn kde_curve(histogram: &[usize; HOURS_PER_DAY], steps: usize) -> Vec<(f64, f64)> {
    let n: usize = histogram.iter().sum();
    if n < 2 || steps < 2 {
        return Vec::new();
    }
    let n = n as f64;

    let weighted = || {
        histogram
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(hour, &count)| (hour as f64, count as f64))
    };

    let mean = weighted().map(|(hour, count)| hour * count).sum::<f64>() / n;
    let variance = weighted()
        .map(|(hour, count)| count * (hour - mean).powi(2))
        .sum::<f64>()
        / (n - 1.0);
    let std_dev = variance.sqrt();
    if std_dev <= f64::EPSILON {
        return Vec::new();
    }

    let bandwidth = std_dev * n.powf(-0.2);
    let norm = 1.0 / (bandwidth * (2.0 * PI).sqrt());
    let (lo, hi) = HOUR_AXIS;

    (0..steps)
        .map(|i| {
            let x = lo + (hi - lo) * i as f64 / (steps - 1) as f64;
            let y = weighted()
                .map(|(hour, count)| {
                    let z = (x - hour) / bandwidth;
                    count * (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm;
            (x, y)
        })
        .collect()
}

/// Vertical bar per hour of day with a smoothed density line on top.
pub fn hourly_histogram_chart(histogram: &[usize; HOURS_PER_DAY]) -> Result<String> {
    let curve = kde_curve(histogram, KDE_STEPS);
    let curve_peak = curve.iter().map(|&(_, y)| y).fold(0.0, f64::max);
    let top = (axis_top(histogram.iter().copied().max().unwrap_or(0)) as f64).max(curve_peak * 1.1);
    let (lo, hi) = HOUR_AXIS;

    render_svg(|root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Accident Distribution by Hour of Day", title_font())
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(lo..hi, 0f64..top)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(HOURS_PER_DAY)
            .x_label_formatter(&|v| format!("{v:.0}"))
            .y_label_formatter(&|v| format!("{v:.0}"))
            .x_desc("Hour of Day")
            .y_desc("Number of Accidents")
            .label_style(label_font())
            .draw()?;

        chart.draw_series(histogram.iter().enumerate().map(|(hour, &count)| {
            let x = hour as f64;
            Rectangle::new(
                [(x - 0.5, 0.0), (x + 0.5, count as f64)],
                HISTOGRAM_COLOR.mix(0.6).filled(),
            )
        }))?;

        chart.draw_series(LineSeries::new(curve, HISTOGRAM_COLOR.stroke_width(2)))?;

        Ok(())
    })
}

/// Horizontal bar chart with the first entry drawn at the top.
fn horizontal_bars(
    title: &str,
    labels: &[String],
    counts: &[usize],
    colors: &[RGBColor],
) -> Result<String> {
    let rows = labels.len().max(1) as u32;
    let top = axis_top(counts.iter().copied().max().unwrap_or(0));
    let label_width = labels
        .iter()
        .map(|l| l.chars().count() as u32 * 8)
        .max()
        .unwrap_or(0)
        .clamp(60, 380);

    render_svg(|root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, title_font())
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(label_width)
            .build_cartesian_2d(0u32..top, (0u32..(rows - 1)).into_segmented())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(rows as usize)
            .y_label_formatter(&|v| {
                segment_label(v, |row| {
                    (rows as usize - 1)
                        .checked_sub(row)
                        .and_then(|i| labels.get(i))
                        .cloned()
                        .unwrap_or_default()
                })
            })
            .x_desc("Number of Accidents")
            .label_style(label_font())
            .draw()?;

        chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let y = rows - 1 - i as u32;
            Rectangle::new(
                [
                    (0, SegmentValue::Exact(y)),
                    (count as u32, SegmentValue::Exact(y + 1)),
                ],
                colors[i % colors.len()].filled(),
            )
        }))?;

        Ok(())
    })
}

pub fn top_causes_chart(causes: &[CategoryCount]) -> Result<String> {
    let labels: Vec<String> = causes.iter().map(|c| c.label.clone()).collect();
    let counts: Vec<usize> = causes.iter().map(|c| c.count).collect();
    horizontal_bars(
        "Top 10 Primary Contributory Causes",
        &labels,
        &counts,
        &RANK_PALETTE,
    )
}

pub fn damage_chart(damage: &[DamageCount]) -> Result<String> {
    let labels: Vec<String> = damage.iter().map(|d| d.damage.label().to_string()).collect();
    let counts: Vec<usize> = damage.iter().map(|d| d.count).collect();
    horizontal_bars(
        "Accident Severity by Damage Cost",
        &labels,
        &counts,
        &DAMAGE_PALETTE,
    )
}

pub fn day_of_week_chart(days: &[DayCount]) -> Result<String> {
    let top = axis_top(days.iter().map(|d| d.count).max().unwrap_or(0));

    render_svg(|root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Accidents by Day of Week", title_font())
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d((0u32..6u32).into_segmented(), 0u32..top)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(7)
            .x_label_formatter(&|v| {
                segment_label(v, |i| {
                    DayOfWeek::ALL
                        .get(i)
                        .map(|d| d.name().to_string())
                        .unwrap_or_default()
                })
            })
            .y_desc("Number of Accidents")
            .label_style(label_font())
            .draw()?;

        chart.draw_series(days.iter().map(|d| {
            let x = d.day.index() as u32;
            Rectangle::new(
                [
                    (SegmentValue::Exact(x), 0),
                    (SegmentValue::Exact(x + 1), d.count as u32),
                ],
                WEEK_PALETTE[d.day.index()].filled(),
            )
        }))?;

        Ok(())
    })
}

fn heat_color(value: usize, max: usize) -> RGBColor {
    let t = share(value, max.max(1));
    let mix = |lo: u8, hi: u8| (lo as f64 + (hi as f64 - lo as f64) * t).round() as u8;
    RGBColor(
        mix(HEAT_LOW.0, HEAT_HIGH.0),
        mix(HEAT_LOW.1, HEAT_HIGH.1),
        mix(HEAT_LOW.2, HEAT_HIGH.2),
    )
}

/// Day × hour heatmap, Monday on the top row.
pub fn hour_day_heatmap(pivot: &HourDayPivot) -> Result<String> {
    let max = pivot.max();

    render_svg(|root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Accident Hotspots: Hour vs Day of Week", title_font())
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(100)
            .build_cartesian_2d(
                (0u32..(HOURS_PER_DAY as u32 - 1)).into_segmented(),
                (0u32..6u32).into_segmented(),
            )?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(HOURS_PER_DAY)
            .y_labels(7)
            .x_label_formatter(&|v| segment_label(v, |h| h.to_string()))
            .y_label_formatter(&|v| {
                segment_label(v, |row| {
                    DayOfWeek::ALL
                        .get(6 - row.min(6))
                        .map(|d| d.name().to_string())
                        .unwrap_or_default()
                })
            })
            .x_desc("Hour of Day")
            .y_desc("Day of Week")
            .label_style(label_font())
            .draw()?;

        chart.draw_series(DayOfWeek::ALL.iter().flat_map(|&day| {
            let y = 6 - day.index() as u32;
            pivot.row(day).iter().enumerate().map(move |(hour, &count)| {
                let x = hour as u32;
                Rectangle::new(
                    [
                        (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                        (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                    ],
                    heat_color(count, max).filled(),
                )
            })
        }))?;

        Ok(())
    })
}

/// Points of a pie slice polygon, counter-clockwise from `start` radians.
fn slice_points(center: (f64, f64), radius: f64, start: f64, end: f64) -> Vec<(i32, i32)> {
    let steps = (((end - start) / (PI / 90.0)).ceil() as usize).max(2);
    let mut points = vec![(center.0.round() as i32, center.1.round() as i32)];
    for step in 0..=steps {
        let angle = start + (end - start) * step as f64 / steps as f64;
        points.push((
            (center.0 + radius * angle.cos()).round() as i32,
            (center.1 - radius * angle.sin()).round() as i32,
        ));
    }
    points
}

/// Pie chart of collapsed weather conditions, starting at twelve o'clock.
pub fn weather_pie_chart(weather: &[CategoryCount]) -> Result<String> {
    let total: usize = weather.iter().map(|w| w.count).sum();

    render_svg(|root| {
        let area = root.titled("Accident Distribution by Weather Conditions", title_font())?;
        let (width, height) = area.dim_in_pixel();
        let center = (width as f64 * 0.38, height as f64 * 0.5);
        let radius = (height as f64 * 0.42).min(width as f64 * 0.3);

        let mut start = PI / 2.0;
        for (i, category) in weather.iter().enumerate() {
            let sweep = 2.0 * PI * share(category.count, total);
            let end = start + sweep;
            let mid = (start + end) / 2.0;
            let color = PASTEL_PALETTE[i % PASTEL_PALETTE.len()];

            let offset = if category.label == HIGHLIGHT_WEATHER {
                radius * 0.1
            } else {
                0.0
            };
            let slice_center = (
                center.0 + offset * mid.cos(),
                center.1 - offset * mid.sin(),
            );

            area.draw(&Polygon::new(
                slice_points(slice_center, radius, start, end),
                color.filled(),
            ))?;

            if sweep > 0.0 {
                let label_pos = (
                    (slice_center.0 + radius * 0.85 * mid.cos()).round() as i32,
                    (slice_center.1 - radius * 0.85 * mid.sin()).round() as i32,
                );
                area.draw(&Text::new(
                    format!("{:.1}%", pct(category.count, total)),
                    label_pos,
                    label_font(),
                ))?;
            }

            let legend_y = 40 + i as i32 * 24;
            let legend_x = (width as f64 * 0.75) as i32;
            area.draw(&Rectangle::new(
                [(legend_x, legend_y), (legend_x + 16, legend_y + 16)],
                color.filled(),
            ))?;
            area.draw(&Text::new(
                category.label.clone(),
                (legend_x + 24, legend_y),
                label_font(),
            ))?;

            start = end;
        }

        area.draw(&Text::new(
            "Weather Conditions",
            ((width as f64 * 0.75) as i32, 12),
            label_font(),
        ))?;

        Ok(())
    })
}
