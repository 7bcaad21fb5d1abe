//! Schema checks and per-row coercion of raw CSV rows into [`AccidentRecord`]s.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use serde::Deserialize;

use crate::dataset::{AccidentRecord, DamageRange, DayOfWeek};
use crate::error::ReportError;

pub const DATE_COLUMN: &str = "crash_date";

/// Columns every source must carry. The date column is checked first.
pub const REQUIRED_COLUMNS: &[&str] = &[
    DATE_COLUMN,
    "crash_hour",
    "crash_day_of_week",
    "prim_contributory_cause",
    "weather_condition",
    "damage",
];

const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// A source row before coercion. Extra columns in the file are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAccidentRow {
    pub crash_date: String,
    pub crash_hour: String,
    pub crash_day_of_week: String,
    pub prim_contributory_cause: String,
    pub weather_condition: String,
    pub damage: String,
}

/// Fails with [`ReportError::Schema`] naming the first required column the
/// header row lacks.
pub fn check_headers(headers: &StringRecord) -> Result<(), ReportError> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == *column) {
            return Err(ReportError::Schema {
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Coerces one raw row. `row` is the 1-based data row number used in errors.
pub fn normalize_row(row: usize, raw: RawAccidentRow) -> Result<AccidentRecord, ReportError> {
    let crash_timestamp = parse_timestamp(row, &raw.crash_date)?;

    let hour = coerce_integer(row, "crash_hour", &raw.crash_hour)?;
    if !(0..=23).contains(&hour) {
        return Err(ReportError::coercion(
            row,
            "crash_hour",
            &raw.crash_hour,
            "hour must be within 0..=23",
        ));
    }

    let day = coerce_day_code(row, &raw.crash_day_of_week)?;

    let damage = DamageRange::from_label(&raw.damage).ok_or_else(|| {
        ReportError::coercion(row, "damage", &raw.damage, "unknown damage range")
    })?;

    Ok(AccidentRecord {
        crash_timestamp,
        crash_hour: hour as u8,
        day,
        primary_cause: raw.prim_contributory_cause.trim().to_string(),
        weather_condition: raw.weather_condition.trim().to_string(),
        damage,
    })
}

/// Parses an integer, truncating numeric text such as `"5.0"` toward zero.
pub fn coerce_integer(row: usize, field: &'static str, value: &str) -> Result<i64, ReportError> {
    let trimmed = value.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f.trunc() as i64),
        _ => Err(ReportError::coercion(row, field, value, "not a number")),
    }
}

/// Maps a day code to its day. Only whole numbers 1..=7 have a day; a
/// fractional code such as `"2.7"` is rejected rather than truncated.
pub fn coerce_day_code(row: usize, value: &str) -> Result<DayOfWeek, ReportError> {
    let trimmed = value.trim();
    let code = match trimmed.parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
            Ok(_) => None,
            Err(_) => {
                return Err(ReportError::coercion(
                    row,
                    "crash_day_of_week",
                    value,
                    "not a number",
                ));
            }
        },
    };

    code.and_then(DayOfWeek::from_code)
        .ok_or_else(|| ReportError::InvalidDayCode {
            row,
            code: trimmed.to_string(),
        })
}

pub fn parse_timestamp(row: usize, value: &str) -> Result<NaiveDateTime, ReportError> {
    let trimmed = value.trim();

    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.naive_local());
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            if let Some(ts) = date.and_hms_opt(0, 0, 0) {
                return Ok(ts);
            }
        }
    }

    Err(ReportError::coercion(
        row,
        DATE_COLUMN,
        value,
        "unrecognized date-time format",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn raw(hour: &str, day: &str) -> RawAccidentRow {
        RawAccidentRow {
            crash_date: "08/18/2023 12:50:00 PM".to_string(),
            crash_hour: hour.to_string(),
            crash_day_of_week: day.to_string(),
            prim_contributory_cause: " FOLLOWING TOO CLOSELY ".to_string(),
            weather_condition: "CLEAR".to_string(),
            damage: "OVER $1,500".to_string(),
        }
    }

    #[test]
    fn test_check_headers_accepts_extra_columns() {
        let headers = StringRecord::from(vec![
            "crash_date",
            "crash_type",
            "crash_hour",
            "crash_day_of_week",
            "prim_contributory_cause",
            "weather_condition",
            "damage",
        ]);
        assert!(check_headers(&headers).is_ok());
    }

    #[test]
    fn test_check_headers_names_missing_date_column() {
        let headers = StringRecord::from(vec!["crash_hour", "damage"]);
        match check_headers(&headers) {
            Err(ReportError::Schema { column }) => assert_eq!(column, "crash_date"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_row() {
        let record = normalize_row(1, raw("13", "6")).unwrap();
        assert_eq!(record.crash_hour, 13);
        assert_eq!(record.day, DayOfWeek::Friday);
        assert_eq!(record.primary_cause, "FOLLOWING TOO CLOSELY");
        assert_eq!(record.damage, DamageRange::Over1500);
        assert_eq!(record.crash_timestamp.year(), 2023);
        assert_eq!(record.crash_timestamp.hour(), 12);
    }

    #[test]
    fn test_hour_truncates_numeric_text() {
        let record = normalize_row(1, raw("5.9", "2")).unwrap();
        assert_eq!(record.crash_hour, 5);
    }

    #[test]
    fn test_non_numeric_hour_is_fatal() {
        let err = normalize_row(4, raw("noon", "2")).unwrap_err();
        match err {
            ReportError::Coercion { row, field, .. } => {
                assert_eq!(row, 4);
                assert_eq!(field, "crash_hour");
            }
            other => panic!("expected coercion error, got {other:?}"),
        }
    }

    #[test]
    fn test_hour_out_of_range_is_fatal() {
        assert!(matches!(
            normalize_row(1, raw("24", "2")),
            Err(ReportError::Coercion { .. })
        ));
    }

    #[test]
    fn test_day_code_out_of_range() {
        assert!(matches!(
            normalize_row(2, raw("1", "8")),
            Err(ReportError::InvalidDayCode { row: 2, ref code }) if code == "8"
        ));
    }

    #[test]
    fn test_fractional_day_code_is_invalid() {
        assert!(matches!(
            normalize_row(3, raw("1", "2.7")),
            Err(ReportError::InvalidDayCode { row: 3, ref code }) if code == "2.7"
        ));
        assert_eq!(coerce_day_code(1, "2.0").unwrap(), DayOfWeek::Monday);
    }

    #[test]
    fn test_non_numeric_day_code() {
        assert!(matches!(
            coerce_day_code(1, "Monday"),
            Err(ReportError::Coercion {
                field: "crash_day_of_week",
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_damage_label() {
        let mut row = raw("1", "2");
        row.damage = "ABOUT $700".to_string();
        assert!(matches!(
            normalize_row(1, row),
            Err(ReportError::Coercion { field: "damage", .. })
        ));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp(1, "2023-08-18 12:50:00").is_ok());
        assert!(parse_timestamp(1, "2023-08-18T12:50:00").is_ok());
        assert!(parse_timestamp(1, "2023-08-18T12:50:00+02:00").is_ok());
        let midnight = parse_timestamp(1, "2023-08-18").unwrap();
        assert_eq!(midnight.hour(), 0);
        assert!(parse_timestamp(1, "yesterday").is_err());
    }
}
