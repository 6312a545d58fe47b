//! Date parsing, formatting, and iteration helpers.

use chrono::{NaiveDate, NaiveTime, TimeDelta, Weekday};
use std::mem::replace;

/// Date format used in raw and finalized CSV files: "YYYY-MM-DD"
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time format used in raw CSV files: "HH:MM:SS"
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Parse a date string in "YYYY-MM-DD" format.
pub fn parse_date(s: &str) -> chrono::ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
}

/// Parse a time string in "HH:MM:SS" format.
pub fn parse_time(s: &str) -> chrono::ParseResult<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
}

/// Format a NaiveDate as "YYYY-MM-DD".
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// English weekday name for a date ("Monday" .. "Sunday").
pub fn weekday_name(date: &NaiveDate) -> &'static str {
    use chrono::Datelike;
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// A date range iterator that yields each date from `start` through `end`
/// (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.start <= self.end {
            let next = self.start + TimeDelta::try_days(1).unwrap();
            Some(replace(&mut self.start, next))
        } else {
            None
        }
    }
}
