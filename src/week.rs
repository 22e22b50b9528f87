// File: ./src/week.rs
// Pure week arithmetic over calendar dates (no time component)
use chrono::{Datelike, Days, NaiveDate};
use thiserror::Error;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Malformed date '{0}': expected YYYY-MM-DD")]
    Malformed(String),

    #[error("Date '{0}' does not exist in the calendar")]
    Invalid(String),

    #[error("Invalid week start {0}: expected 0 (Sunday) or 1 (Monday)")]
    WeekStart(u8),
}

/// First day of the week. The meal grid always uses `Monday`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekStart {
    Sunday,
    #[default]
    Monday,
}

impl WeekStart {
    fn offset_from_sunday(self) -> u32 {
        match self {
            WeekStart::Sunday => 0,
            WeekStart::Monday => 1,
        }
    }
}

impl TryFrom<u8> for WeekStart {
    type Error = DateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WeekStart::Sunday),
            1 => Ok(WeekStart::Monday),
            other => Err(DateError::WeekStart(other)),
        }
    }
}

/// Strict `YYYY-MM-DD` parsing. Anything else is rejected, including
/// single-digit months/days and dates that do not exist.
pub fn parse_iso(value: &str) -> Result<NaiveDate, DateError> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_formed {
        return Err(DateError::Malformed(value.to_string()));
    }
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)
        .map_err(|_| DateError::Invalid(value.to_string()))
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

// Saturates at the edges of chrono's representable range.
fn sub_days(date: NaiveDate, n: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(n)).unwrap_or(NaiveDate::MIN)
}

fn add_days(date: NaiveDate, n: u64) -> NaiveDate {
    date.checked_add_days(Days::new(n)).unwrap_or(NaiveDate::MAX)
}

/// Floors `date` to the first day of its week.
pub fn week_start(date: NaiveDate, starts_on: WeekStart) -> NaiveDate {
    let from_sunday = date.weekday().num_days_from_sunday();
    let back = (from_sunday + 7 - starts_on.offset_from_sunday()) % 7;
    sub_days(date, back as u64)
}

/// Last day of the week containing `date`.
pub fn week_end(date: NaiveDate, starts_on: WeekStart) -> NaiveDate {
    add_days(week_start(date, starts_on), 6)
}

/// The seven days of the week containing `date`, as ISO strings, first day first.
pub fn week_days(date: NaiveDate, starts_on: WeekStart) -> [String; 7] {
    let start = week_start(date, starts_on);
    std::array::from_fn(|i| format_iso(add_days(start, i as u64)))
}

/// Same as [`week_days`] but keeps the dates typed.
pub fn week_dates(date: NaiveDate, starts_on: WeekStart) -> [NaiveDate; 7] {
    let start = week_start(date, starts_on);
    std::array::from_fn(|i| add_days(start, i as u64))
}

pub fn is_same_week(a: NaiveDate, b: NaiveDate, starts_on: WeekStart) -> bool {
    week_start(a, starts_on) == week_start(b, starts_on)
}

/// `(start, end)` of the week as ISO strings, suitable for range queries.
pub fn week_range(date: NaiveDate, starts_on: WeekStart) -> (String, String) {
    (
        format_iso(week_start(date, starts_on)),
        format_iso(week_end(date, starts_on)),
    )
}

/// Start of the week before the one containing `date`.
pub fn previous_week(date: NaiveDate, starts_on: WeekStart) -> NaiveDate {
    sub_days(week_start(date, starts_on), 7)
}

/// Start of the week after the one containing `date`.
pub fn next_week(date: NaiveDate, starts_on: WeekStart) -> NaiveDate {
    add_days(week_start(date, starts_on), 7)
}

/// "Nov 11 - Nov 17, 2024"
pub fn week_label(date: NaiveDate, starts_on: WeekStart) -> String {
    format_range(week_start(date, starts_on), week_end(date, starts_on))
}

/// "MMM d - MMM d, yyyy", the year taken from `end`.
pub fn format_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", start.format("%b %-d"), end.format("%b %-d, %Y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn d(s: &str) -> NaiveDate {
        parse_iso(s).unwrap()
    }

    #[test]
    fn week_start_floors_to_monday() {
        // 2024-11-14 is a Thursday
        assert_eq!(week_start(d("2024-11-14"), WeekStart::Monday), d("2024-11-11"));
        assert_eq!(week_start(d("2024-11-11"), WeekStart::Monday), d("2024-11-11"));
        assert_eq!(week_start(d("2024-11-17"), WeekStart::Monday), d("2024-11-11"));
        assert_eq!(week_start(d("2024-11-18"), WeekStart::Monday), d("2024-11-18"));
    }

    #[test]
    fn week_start_sunday_convention() {
        assert_eq!(week_start(d("2024-11-14"), WeekStart::Sunday), d("2024-11-10"));
        assert_eq!(week_start(d("2024-11-10"), WeekStart::Sunday), d("2024-11-10"));
        assert_eq!(week_end(d("2024-11-14"), WeekStart::Sunday), d("2024-11-16"));
    }

    #[test]
    fn week_start_is_idempotent() {
        let mut day = d("2023-12-25");
        for _ in 0..800 {
            let once = week_start(day, WeekStart::Monday);
            assert_eq!(week_start(once, WeekStart::Monday), once);
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn week_days_are_seven_increasing_from_monday() {
        let mut day = d("2024-02-20");
        for _ in 0..60 {
            let days = week_days(day, WeekStart::Monday);
            assert_eq!(days.len(), 7);
            let parsed: Vec<NaiveDate> = days.iter().map(|s| d(s)).collect();
            assert_eq!(parsed[0].weekday(), Weekday::Mon);
            assert!(parsed.windows(2).all(|w| w[0] < w[1]));
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn week_days_cross_month_boundary() {
        let days = week_days(d("2024-03-01"), WeekStart::Monday);
        assert_eq!(days[0], "2024-02-26");
        assert_eq!(days[3], "2024-02-29");
        assert_eq!(days[6], "2024-03-03");
    }

    #[test]
    fn same_week_checks() {
        assert!(is_same_week(d("2024-11-11"), d("2024-11-17"), WeekStart::Monday));
        assert!(!is_same_week(d("2024-11-17"), d("2024-11-18"), WeekStart::Monday));
        // Sunday belongs to the next week when weeks start on Sunday
        assert!(!is_same_week(d("2024-11-16"), d("2024-11-17"), WeekStart::Sunday));
    }

    #[test]
    fn adjacent_weeks_and_range() {
        assert_eq!(previous_week(d("2024-11-13"), WeekStart::Monday), d("2024-11-04"));
        assert_eq!(next_week(d("2024-11-13"), WeekStart::Monday), d("2024-11-18"));
        assert_eq!(
            week_range(d("2024-12-31"), WeekStart::Monday),
            ("2024-12-30".to_string(), "2025-01-05".to_string())
        );
    }

    #[test]
    fn malformed_dates_fail_fast() {
        assert!(matches!(parse_iso("2024-1-05"), Err(DateError::Malformed(_))));
        assert!(matches!(parse_iso("11/11/2024"), Err(DateError::Malformed(_))));
        assert!(matches!(parse_iso(""), Err(DateError::Malformed(_))));
        assert!(matches!(parse_iso("2024-11-11T00:00"), Err(DateError::Malformed(_))));
        assert!(matches!(parse_iso("2024-02-30"), Err(DateError::Invalid(_))));
        assert!(parse_iso("2024-02-29").is_ok());
    }

    #[test]
    fn week_start_from_number() {
        assert_eq!(WeekStart::try_from(0), Ok(WeekStart::Sunday));
        assert_eq!(WeekStart::try_from(1), Ok(WeekStart::Monday));
        assert_eq!(WeekStart::try_from(3), Err(DateError::WeekStart(3)));
    }

    #[test]
    fn label_spans_year_end() {
        assert_eq!(week_label(d("2024-11-13"), WeekStart::Monday), "Nov 11 - Nov 17, 2024");
        assert_eq!(week_label(d("2025-01-01"), WeekStart::Monday), "Dec 30 - Jan 5, 2025");
    }
}
