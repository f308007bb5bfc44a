//! Calendar-day helpers: the `YYYYMMDD` wire format and day-granular ordering.
//!
//! Everything in the engine works on whole days. Reference dates may arrive as
//! any `chrono::Datelike` value (a bare date, a naive timestamp, a zoned
//! timestamp) and are collapsed to their calendar day before comparison.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{RepeatError, Result};

/// A year/month/day triple with no time-of-day component.
pub type CalendarDate = NaiveDate;

/// `chrono` format string for the fixed 8-digit storage format.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Parse a strict `YYYYMMDD` string.
///
/// `chrono`'s `%Y` accepts signs and variable widths, so the shape is checked
/// first: exactly eight ASCII digits, then a valid calendar date.
pub fn parse_date(s: &str) -> Result<CalendarDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RepeatError::InvalidDateFormat(s.to_string()));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| RepeatError::InvalidDateFormat(s.to_string()))
}

/// Render a date in the `YYYYMMDD` storage format.
///
/// Only years 0..=9999 have an 8-digit form; anything else is
/// `RepeatError::DateOutOfRange` rather than a signed or widened string.
pub fn format_date(date: CalendarDate) -> Result<String> {
    if !(0..=9999).contains(&date.year()) {
        let reason = format!("{} has no YYYYMMDD form", date);
        return Err(RepeatError::DateOutOfRange(reason));
    }
    Ok(date.format(DATE_FORMAT).to_string())
}

/// Collapse any `Datelike` value to its calendar day.
pub fn calendar_day<D: Datelike>(d: &D) -> Result<CalendarDate> {
    NaiveDate::from_ymd_opt(d.year(), d.month(), d.day()).ok_or_else(|| {
        RepeatError::DateOutOfRange(format!("{}-{}-{}", d.year(), d.month(), d.day()))
    })
}

/// `true` when `a` falls on a later calendar day than `b`.
///
/// Compares `(year, month, day)` lexicographically; hours, minutes, seconds
/// and offsets are ignored, so two instants on the same day are never after
/// one another.
pub fn is_strictly_after<A: Datelike, B: Datelike>(a: &A, b: &B) -> bool {
    (a.year(), a.month(), a.day()) > (b.year(), b.month(), b.day())
}

/// The day after `date`.
pub(crate) fn next_day(date: CalendarDate) -> Result<CalendarDate> {
    add_days(date, 1)
}

/// `date + days`, failing instead of panicking at the end of chrono's range.
pub(crate) fn add_days(date: CalendarDate, days: u64) -> Result<CalendarDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| RepeatError::DateOutOfRange(format!("{} + {} days", date, days)))
}

/// First day of the month following `date`'s month, rolling December into
/// January of the next year.
pub(crate) fn first_of_next_month(date: CalendarDate) -> Result<CalendarDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| RepeatError::DateOutOfRange(format!("month after {}", date)))
}

/// Number of the last day in `date`'s month (28..=31).
///
/// Computed as the day before the first of the next month.
pub(crate) fn last_day_of_month(date: CalendarDate) -> Result<u32> {
    first_of_next_month(date)?
        .pred_opt()
        .map(|d| d.day())
        .ok_or_else(|| RepeatError::DateOutOfRange(format!("end of month of {}", date)))
}
