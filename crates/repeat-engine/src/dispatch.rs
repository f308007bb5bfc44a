//! String entry points -- the stored `YYYYMMDD` date and rule text in, the next
//! date out.

use chrono::Datelike;
use tracing::debug;

use crate::date::{calendar_day, format_date, parse_date};
use crate::error::Result;
use crate::rule::RecurrenceRule;

/// Compute the next occurrence of a repeating task.
///
/// # Arguments
/// - `now` -- reference date; only its calendar day is used
/// - `start_date` -- the task's stored date, `YYYYMMDD`
/// - `rule` -- repeat rule text, e.g. `"d 7"`, `"w 1,3"`, `"m -1 1,6"`, `"y"`
///
/// Returns the first date produced by `rule` from `start_date` that is
/// strictly after `now`, formatted as `YYYYMMDD`.
///
/// Fails with `RepeatError::DateOutOfRange` when that date lies past year 9999.
///
/// # Errors
/// - `RepeatError::InvalidDateFormat` if `start_date` is not `YYYYMMDD`
/// - `RepeatError::EmptyRule` if `rule` is blank
/// - `RepeatError::UnknownRuleKind` if the tag is not `d`, `w`, `m` or `y`
/// - the kind-specific parameter errors from [`RecurrenceRule::parse`]
pub fn next_date<D: Datelike>(now: &D, start_date: &str, rule: &str) -> Result<String> {
    let start = parse_date(start_date)?;
    let rule = RecurrenceRule::parse(rule)?;
    let now = calendar_day(now)?;

    let next = rule.next_after(start, now)?;
    debug!(%rule, %start, %now, %next, "computed next occurrence");
    format_date(next)
}

/// [`next_date`] with the reference date also given as `YYYYMMDD`.
pub fn next_date_str(now: &str, start_date: &str, rule: &str) -> Result<String> {
    let now = parse_date(now)?;
    next_date(&now, start_date, rule)
}
