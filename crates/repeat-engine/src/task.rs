//! Task roll-forward -- what happens to a task's stored date when it is
//! created or marked done.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::{calendar_day, format_date, is_strictly_after, parse_date};
use crate::dispatch::next_date;
use crate::error::Result;
use crate::rule::RecurrenceRule;

/// Outcome of completing a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "date", rename_all = "snake_case")]
pub enum Completion {
    /// One-off task: delete it.
    Remove,
    /// Repeating task: move it to this `YYYYMMDD` date.
    Reschedule(String),
}

/// The date a new task should be stored with.
///
/// - An empty `date` becomes today.
/// - A date in the past becomes today for one-off tasks, or the next
///   occurrence after today for repeating ones.
/// - Today or a future date is kept.
///
/// A non-empty `repeat` is validated even when the date is kept, so a task is
/// never stored with a rule that cannot be evaluated later.
///
/// # Errors
/// `RepeatError::InvalidDateFormat` for a malformed `date`, or any rule error
/// for a malformed `repeat`.
pub fn resolve_task_date<D: Datelike>(now: &D, date: &str, repeat: &str) -> Result<String> {
    let today = calendar_day(now)?;
    let rule = if repeat.is_empty() {
        None
    } else {
        Some(RecurrenceRule::parse(repeat)?)
    };

    if date.is_empty() {
        return format_date(today);
    }
    let stored = parse_date(date)?;
    if stored == today || is_strictly_after(&stored, &today) {
        return Ok(date.to_string());
    }

    let resolved = match rule {
        None => today,
        Some(rule) => rule.next_after(stored, today)?,
    };
    debug!(from = %stored, to = %resolved, "rolled past task date forward");
    format_date(resolved)
}

/// What to do with a task that was just marked done.
pub fn complete_task<D: Datelike>(now: &D, date: &str, repeat: &str) -> Result<Completion> {
    if repeat.is_empty() {
        return Ok(Completion::Remove);
    }
    next_date(now, date, repeat).map(Completion::Reschedule)
}
