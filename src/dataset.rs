use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Day of the week in canonical report order, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All days in canonical order.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Maps a source day code to a day.
    ///
    /// | Code | Day       |
    /// |------|-----------|
    /// | 1    | Sunday    |
    /// | 2    | Monday    |
    /// | 3    | Tuesday   |
    /// | 4    | Wednesday |
    /// | 5    | Thursday  |
    /// | 6    | Friday    |
    /// | 7    | Saturday  |
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(DayOfWeek::Sunday),
            2 => Some(DayOfWeek::Monday),
            3 => Some(DayOfWeek::Tuesday),
            4 => Some(DayOfWeek::Wednesday),
            5 => Some(DayOfWeek::Thursday),
            6 => Some(DayOfWeek::Friday),
            7 => Some(DayOfWeek::Saturday),
            _ => None,
        }
    }

    /// Position in canonical order (Monday = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reported damage bracket, ordered from cheapest to most expensive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DamageRange {
    #[serde(rename = "$500 OR LESS")]
    UpTo500,
    #[serde(rename = "$501 - $1,500")]
    From501To1500,
    #[serde(rename = "OVER $1,500")]
    Over1500,
}

impl DamageRange {
    pub const ALL: [DamageRange; 3] = [
        DamageRange::UpTo500,
        DamageRange::From501To1500,
        DamageRange::Over1500,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DamageRange::UpTo500 => "$500 OR LESS",
            DamageRange::From501To1500 => "$501 - $1,500",
            DamageRange::Over1500 => "OVER $1,500",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        DamageRange::ALL
            .into_iter()
            .find(|d| d.label() == label.trim())
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DamageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One normalized accident row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccidentRecord {
    pub crash_timestamp: NaiveDateTime,
    pub crash_hour: u8,
    pub day: DayOfWeek,
    pub primary_cause: String,
    pub weather_condition: String,
    pub damage: DamageRange,
}

impl AccidentRecord {
    /// The contributory cause, or `None` when the source cell was blank.
    pub fn known_cause(&self) -> Option<&str> {
        non_blank(&self.primary_cause)
    }

    /// The weather condition, or `None` when the source cell was blank.
    pub fn known_weather(&self) -> Option<&str> {
        non_blank(&self.weather_condition)
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// The loaded accident records.
///
/// Immutable once built; the server shares a single instance behind an `Arc`
/// and every report is computed from a borrow of it.
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    records: Vec<AccidentRecord>,
}

impl Dataset {
    pub fn new(records: Vec<AccidentRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccidentRecord> {
        self.records.iter()
    }
}

impl FromIterator<AccidentRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = AccidentRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_codes_start_on_sunday() {
        assert_eq!(DayOfWeek::from_code(1), Some(DayOfWeek::Sunday));
        assert_eq!(DayOfWeek::from_code(2), Some(DayOfWeek::Monday));
        assert_eq!(DayOfWeek::from_code(7), Some(DayOfWeek::Saturday));
    }

    #[test]
    fn test_day_codes_out_of_range() {
        assert_eq!(DayOfWeek::from_code(0), None);
        assert_eq!(DayOfWeek::from_code(8), None);
        assert_eq!(DayOfWeek::from_code(-1), None);
    }

    #[test]
    fn test_canonical_day_order() {
        let names: Vec<_> = DayOfWeek::ALL.iter().map(|d| d.name()).collect();
        assert_eq!(
            names,
            ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]
        );
        assert_eq!(DayOfWeek::Sunday.index(), 6);
        assert!(DayOfWeek::Monday < DayOfWeek::Sunday);
    }

    #[test]
    fn test_damage_labels() {
        assert_eq!(
            DamageRange::from_label("$501 - $1,500"),
            Some(DamageRange::From501To1500)
        );
        assert_eq!(
            DamageRange::from_label(" OVER $1,500 "),
            Some(DamageRange::Over1500)
        );
        assert_eq!(DamageRange::from_label("$1,000"), None);
        assert_eq!(
            serde_json::to_string(&DamageRange::UpTo500).unwrap(),
            "\"$500 OR LESS\""
        );
    }
}
