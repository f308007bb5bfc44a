//! Rule evaluation -- advances a start date to the first occurrence after "now".
//!
//! Weekly and monthly rules scan day by day. Because every day that is not
//! strictly after `now` is rejected anyway, scanning starts at
//! `max(start, now + 1)`, which bounds the scan without changing the result.

use std::collections::BTreeSet;

use chrono::Datelike;

use crate::date::{
    add_days, first_of_next_month, is_strictly_after, last_day_of_month, next_day, CalendarDate,
};
use crate::error::{RepeatError, Result};
use crate::rule::{DayOfMonth, MonthFilter, RecurrenceRule};

impl RecurrenceRule {
    /// First occurrence of this rule, counted from `start`, that falls on a
    /// calendar day strictly after `now`.
    ///
    /// # Errors
    /// Returns the validation error if the rule violates its invariants, and
    /// `RepeatError::DateOutOfRange` if the search runs off chrono's calendar.
    pub fn next_after(&self, start: CalendarDate, now: CalendarDate) -> Result<CalendarDate> {
        self.validate()?;
        match self {
            RecurrenceRule::Daily { interval_days } => next_daily(start, now, *interval_days),
            RecurrenceRule::Weekly { weekdays } => next_weekly(start, now, weekdays),
            RecurrenceRule::Monthly { days, months } => next_monthly(start, now, days, months),
            RecurrenceRule::Yearly => next_yearly(start, now),
        }
    }
}

/// Step forward `interval` days at a time; at least one step is always taken.
fn next_daily(start: CalendarDate, now: CalendarDate, interval: u32) -> Result<CalendarDate> {
    let step = u64::from(interval);
    let mut date = add_days(start, step)?;

    if !is_strictly_after(&date, &now) {
        // Jump to the last multiple of the interval that is not after `now`.
        let behind = u64::try_from((now - start).num_days()).unwrap_or(0);
        date = add_days(start, behind / step * step)?;
    }
    while !is_strictly_after(&date, &now) {
        date = add_days(date, step)?;
    }
    Ok(date)
}

fn next_weekly(
    start: CalendarDate,
    now: CalendarDate,
    weekdays: &BTreeSet<u32>,
) -> Result<CalendarDate> {
    let mut date = scan_origin(start, now)?;
    for _ in 0..7 {
        if weekdays.contains(&date.weekday().number_from_monday()) {
            return Ok(date);
        }
        date = next_day(date)?;
    }
    Err(RepeatError::MalformedRuleParameters(
        "weekly rule matched no weekday".to_string(),
    ))
}

fn next_monthly(
    start: CalendarDate,
    now: CalendarDate,
    days: &BTreeSet<DayOfMonth>,
    months: &MonthFilter,
) -> Result<CalendarDate> {
    let mut date = scan_origin(start, now)?;
    loop {
        if !months.contains(date.month()) {
            date = first_of_next_month(date)?;
            continue;
        }
        let last_day = last_day_of_month(date)?;
        if days.iter().any(|d| d.matches(date.day(), last_day)) {
            return Ok(date);
        }
        date = next_day(date)?;
    }
}

/// Same month/day every year, with February 29 falling back to March 1 in
/// common years. The anchor is always the start date's month/day, so a Feb 29
/// series returns to Feb 29 in leap years instead of staying on March 1.
fn next_yearly(start: CalendarDate, now: CalendarDate) -> Result<CalendarDate> {
    // Any candidate in a year before `now`'s cannot be after it.
    let mut year = (start.year() + 1).max(now.year());
    loop {
        let candidate = yearly_candidate(start, year)?;
        if is_strictly_after(&candidate, &now) {
            return Ok(candidate);
        }
        year += 1;
    }
}

fn yearly_candidate(start: CalendarDate, year: i32) -> Result<CalendarDate> {
    CalendarDate::from_ymd_opt(year, start.month(), start.day())
        .or_else(|| {
            if start.month() == 2 && start.day() == 29 {
                CalendarDate::from_ymd_opt(year, 3, 1)
            } else {
                None
            }
        })
        .ok_or_else(|| RepeatError::DateOutOfRange(format!("{} in year {}", start, year)))
}

/// Where a day-by-day scan starts: `start` itself if it is already after
/// `now`, otherwise the day after `now`.
fn scan_origin(start: CalendarDate, now: CalendarDate) -> Result<CalendarDate> {
    if is_strictly_after(&start, &now) {
        Ok(start)
    } else {
        next_day(now)
    }
}
