use tracing::debug;

use crate::analyzers::types::{
    AggregateResult, CategoryCount, DamageCount, DayCount, HOURS_PER_DAY, HourDayPivot,
};
use crate::analyzers::utility::{mode_of, value_counts};
use crate::analyzers::weather::weather_distribution;
use crate::dataset::{DamageRange, Dataset, DayOfWeek};
use crate::error::ReportError;

/// Number of causes kept in the cause ranking.
pub const TOP_CAUSES: usize = 10;

/// Computes every headline statistic and chart dataset from one snapshot.
///
/// # Errors
///
/// Returns [`ReportError::EmptyDataset`] when the dataset has no records,
/// since the mode statistics are undefined.
#[tracing::instrument(skip_all, fields(records = dataset.len()))]
pub fn compute_report(dataset: &Dataset) -> Result<AggregateResult, ReportError> {
    let result = AggregateResult {
        total_accidents: total_accidents(dataset),
        most_common_cause: most_common_cause(dataset)?,
        most_frequent_weather: most_frequent_weather(dataset)?,
        peak_hour: peak_hour(dataset)?,
        most_frequent_day: most_frequent_day(dataset)?,
        most_common_damage: most_common_damage(dataset)?,
        hourly_histogram: hourly_histogram(dataset),
        top_causes: top_causes(dataset, TOP_CAUSES),
        weather_distribution: weather_distribution(dataset),
        day_of_week_counts: day_of_week_counts(dataset),
        hour_day_pivot: hour_day_pivot(dataset),
        damage_distribution: damage_distribution(dataset),
    };

    debug!(
        total = result.total_accidents,
        peak_hour = result.peak_hour,
        most_frequent_day = %result.most_frequent_day,
        weather_categories = result.weather_distribution.len(),
        "Report computed"
    );

    Ok(result)
}

pub fn total_accidents(dataset: &Dataset) -> usize {
    dataset.len()
}

/// Most frequent non-blank cause. Fails when every cause is blank.
pub fn most_common_cause(dataset: &Dataset) -> Result<String, ReportError> {
    mode_of(
        dataset.iter().filter_map(|r| r.known_cause()),
        "most common cause",
    )
    .map(str::to_string)
}

/// Most frequent non-blank weather condition.
pub fn most_frequent_weather(dataset: &Dataset) -> Result<String, ReportError> {
    mode_of(
        dataset.iter().filter_map(|r| r.known_weather()),
        "most frequent weather",
    )
    .map(str::to_string)
}

pub fn peak_hour(dataset: &Dataset) -> Result<u8, ReportError> {
    mode_of(dataset.iter().map(|r| r.crash_hour), "peak hour")
}

pub fn most_frequent_day(dataset: &Dataset) -> Result<DayOfWeek, ReportError> {
    mode_of(dataset.iter().map(|r| r.day), "most frequent day")
}

pub fn most_common_damage(dataset: &Dataset) -> Result<DamageRange, ReportError> {
    mode_of(dataset.iter().map(|r| r.damage), "most common damage")
}

/// Records per hour of day; all 24 buckets are present.
pub fn hourly_histogram(dataset: &Dataset) -> [usize; HOURS_PER_DAY] {
    let mut bins = [0; HOURS_PER_DAY];
    for record in dataset.iter() {
        bins[record.crash_hour as usize] += 1;
    }
    bins
}

/// The `limit` most frequent causes, by count descending then name. Blank
/// causes are not ranked.
pub fn top_causes(dataset: &Dataset, limit: usize) -> Vec<CategoryCount> {
    let mut ranked: Vec<CategoryCount> =
        value_counts(dataset.iter().filter_map(|r| r.known_cause()))
            .into_iter()
            .map(|(cause, count)| CategoryCount::new(cause, count))
            .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    ranked.truncate(limit);
    ranked
}

/// Records per day, Monday first, zero-filled.
pub fn day_of_week_counts(dataset: &Dataset) -> Vec<DayCount> {
    let mut counts = [0; 7];
    for record in dataset.iter() {
        counts[record.day.index()] += 1;
    }
    DayOfWeek::ALL
        .iter()
        .map(|&day| DayCount {
            day,
            count: counts[day.index()],
        })
        .collect()
}

pub fn hour_day_pivot(dataset: &Dataset) -> HourDayPivot {
    let mut pivot = HourDayPivot::default();
    for record in dataset.iter() {
        pivot.counts[record.day.index()][record.crash_hour as usize] += 1;
    }
    pivot
}

/// Records per damage range in bracket order, zero-filled.
pub fn damage_distribution(dataset: &Dataset) -> Vec<DamageCount> {
    let mut counts = [0; 3];
    for record in dataset.iter() {
        counts[record.damage.index()] += 1;
    }
    DamageRange::ALL
        .iter()
        .map(|&damage| DamageCount {
            damage,
            count: counts[damage.index()],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::AccidentRecord;
    use chrono::NaiveDate;

    fn record(hour: u8, day: DayOfWeek, cause: &str, weather: &str) -> AccidentRecord {
        AccidentRecord {
            crash_timestamp: NaiveDate::from_ymd_opt(2023, 8, 14)
                .unwrap()
                .and_hms_opt(hour as u32, 0, 0)
                .unwrap(),
            crash_hour: hour,
            day,
            primary_cause: cause.to_string(),
            weather_condition: weather.to_string(),
            damage: DamageRange::UpTo500,
        }
    }

    fn three_record_dataset() -> Dataset {
        Dataset::new(vec![
            record(0, DayOfWeek::Monday, "A", "CLEAR"),
            record(0, DayOfWeek::Monday, "A", "CLEAR"),
            record(5, DayOfWeek::Monday, "B", "CLEAR"),
        ])
    }

    fn mixed_dataset() -> Dataset {
        let days = DayOfWeek::ALL;
        let causes = [
            "C01", "C02", "C03", "C04", "C05", "C06", "C07", "C08", "C09", "C10", "C11", "C12",
        ];
        let weathers = ["CLEAR", "CLEAR", "RAIN", "CLEAR", "SNOW"];
        (0..120)
            .map(|i| {
                let mut r = record(
                    (i * 7 % 24) as u8,
                    days[i % 7],
                    causes[i % (1 + i % causes.len())],
                    weathers[i % weathers.len()],
                );
                r.damage = DamageRange::ALL[i % 2];
                r
            })
            .collect()
    }

    #[test]
    fn test_three_record_scenario() {
        let report = compute_report(&three_record_dataset()).unwrap();

        assert_eq!(report.total_accidents, 3);
        assert_eq!(report.peak_hour, 0);
        assert_eq!(report.most_frequent_day, DayOfWeek::Monday);
        assert_eq!(report.most_common_cause, "A");
        assert_eq!(report.most_frequent_weather, "CLEAR");
        assert_eq!(report.most_common_damage, DamageRange::UpTo500);
        assert_eq!(report.hourly_histogram[0], 2);
        assert_eq!(report.hourly_histogram[5], 1);
        let others: usize = report
            .hourly_histogram
            .iter()
            .enumerate()
            .filter(|(h, _)| *h != 0 && *h != 5)
            .map(|(_, c)| c)
            .sum();
        assert_eq!(others, 0);
    }

    #[test]
    fn test_empty_dataset_modes_fail() {
        let empty = Dataset::default();
        assert!(matches!(
            compute_report(&empty),
            Err(ReportError::EmptyDataset { .. })
        ));
        assert!(peak_hour(&empty).is_err());
        assert!(most_common_cause(&empty).is_err());
    }

    #[test]
    fn test_empty_dataset_keeps_fixed_shapes() {
        let empty = Dataset::default();
        assert_eq!(hourly_histogram(&empty), [0; 24]);
        let pivot = hour_day_pivot(&empty);
        assert_eq!(pivot.counts.len(), 7);
        assert_eq!(pivot.total(), 0);
        assert_eq!(day_of_week_counts(&empty).len(), 7);
        assert_eq!(damage_distribution(&empty).len(), 3);
        assert!(top_causes(&empty, TOP_CAUSES).is_empty());
    }

    #[test]
    fn test_counts_sum_to_total() {
        let dataset = mixed_dataset();
        let total = total_accidents(&dataset);

        assert_eq!(hourly_histogram(&dataset).iter().sum::<usize>(), total);
        assert_eq!(
            day_of_week_counts(&dataset).iter().map(|d| d.count).sum::<usize>(),
            total
        );
        assert_eq!(hour_day_pivot(&dataset).total(), total);
        assert_eq!(
            damage_distribution(&dataset).iter().map(|d| d.count).sum::<usize>(),
            total
        );
        assert_eq!(
            weather_distribution(&dataset).iter().map(|w| w.count).sum::<usize>(),
            total
        );
    }

    #[test]
    fn test_top_causes_truncated_and_sorted() {
        let top = top_causes(&mixed_dataset(), TOP_CAUSES);
        assert!(top.len() <= TOP_CAUSES);
        assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_blank_cause_and_weather_are_not_categories() {
        let dataset = Dataset::new(vec![
            record(2, DayOfWeek::Friday, "", ""),
            record(2, DayOfWeek::Friday, "  ", ""),
            record(4, DayOfWeek::Monday, "A", "CLEAR"),
        ]);
        let report = compute_report(&dataset).unwrap();

        assert_eq!(report.total_accidents, 3);
        assert_eq!(report.most_common_cause, "A");
        assert_eq!(report.most_frequent_weather, "CLEAR");
        assert_eq!(report.top_causes, vec![CategoryCount::new("A", 1)]);
        assert_eq!(
            report.weather_distribution,
            vec![CategoryCount::new("CLEAR", 1)]
        );

        // blank rows still count everywhere else
        assert_eq!(report.peak_hour, 2);
        assert_eq!(report.most_frequent_day, DayOfWeek::Friday);
        assert_eq!(report.hourly_histogram.iter().sum::<usize>(), 3);
        assert_eq!(report.hour_day_pivot.total(), 3);
    }

    #[test]
    fn test_all_blank_causes_have_no_mode() {
        let dataset = Dataset::new(vec![record(1, DayOfWeek::Monday, "", "CLEAR")]);
        assert!(matches!(
            most_common_cause(&dataset),
            Err(ReportError::EmptyDataset {
                statistic: "most common cause"
            })
        ));
        assert!(top_causes(&dataset, TOP_CAUSES).is_empty());
    }

    #[test]
    fn test_top_causes_ties_by_name() {
        let dataset = Dataset::new(vec![
            record(1, DayOfWeek::Monday, "B", "CLEAR"),
            record(1, DayOfWeek::Monday, "A", "CLEAR"),
            record(1, DayOfWeek::Monday, "C", "CLEAR"),
            record(1, DayOfWeek::Monday, "C", "CLEAR"),
        ]);
        let labels: Vec<_> = top_causes(&dataset, 2)
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, ["C", "A"]);
    }

    #[test]
    fn test_day_counts_in_canonical_order() {
        let dataset = Dataset::new(vec![
            record(1, DayOfWeek::Sunday, "A", "CLEAR"),
            record(1, DayOfWeek::Wednesday, "A", "CLEAR"),
            record(1, DayOfWeek::Sunday, "A", "CLEAR"),
        ]);
        let counts = day_of_week_counts(&dataset);
        assert_eq!(counts[0].day, DayOfWeek::Monday);
        assert_eq!(counts[0].count, 0);
        assert_eq!(counts[2].count, 1);
        assert_eq!(counts[6].day, DayOfWeek::Sunday);
        assert_eq!(counts[6].count, 2);
        assert_eq!(most_frequent_day(&dataset).unwrap(), DayOfWeek::Sunday);
    }

    #[test]
    fn test_pivot_cells() {
        let dataset = Dataset::new(vec![
            record(23, DayOfWeek::Saturday, "A", "CLEAR"),
            record(23, DayOfWeek::Saturday, "A", "CLEAR"),
            record(8, DayOfWeek::Tuesday, "A", "CLEAR"),
        ]);
        let pivot = hour_day_pivot(&dataset);
        assert_eq!(pivot.count(DayOfWeek::Saturday, 23), 2);
        assert_eq!(pivot.count(DayOfWeek::Tuesday, 8), 1);
        assert_eq!(pivot.count(DayOfWeek::Monday, 8), 0);
        assert_eq!(pivot.max(), 2);
    }

    #[test]
    fn test_damage_distribution_zero_fills() {
        let dist = damage_distribution(&three_record_dataset());
        assert_eq!(
            dist,
            vec![
                DamageCount {
                    damage: DamageRange::UpTo500,
                    count: 3
                },
                DamageCount {
                    damage: DamageRange::From501To1500,
                    count: 0
                },
                DamageCount {
                    damage: DamageRange::Over1500,
                    count: 0
                },
            ]
        );
    }

    #[test]
    fn test_report_serializes_camel_case_keys() {
        let report = compute_report(&three_record_dataset()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        for key in [
            "totalAccidents",
            "mostCommonCause",
            "mostFrequentWeather",
            "peakHour",
            "mostFrequentDay",
            "mostCommonDamage",
            "hourlyHistogram",
            "topCauses",
            "weatherDistribution",
            "dayOfWeekCounts",
            "hourDayPivot",
            "damageDistribution",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["mostFrequentDay"], "Monday");
        assert_eq!(json["mostCommonDamage"], "$500 OR LESS");
    }
}
