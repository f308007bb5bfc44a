//! Repeat-rule grammar -- parses compact rule strings into [`RecurrenceRule`].
//!
//! ```text
//! d <n>                 every n days, 1 <= n <= 400
//! w <d>[,<d>...]        on weekdays 1 (Monday) ..= 7 (Sunday)
//! m <day>[,<day>...] [<month>[,<month>...]]
//!                       on days 1..=31, -1 (last) or -2 (second to last),
//!                       optionally only in months 1..=12
//! y                     every year on the start date's month/day
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RepeatError, Result};

/// Longest interval a daily rule may use.
pub const MAX_INTERVAL_DAYS: u32 = 400;

/// Longest each month can ever be, February counted in leap years.
const MAX_DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A parsed repeat rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecurrenceRule {
    /// Every `interval_days` days after the start date.
    Daily { interval_days: u32 },
    /// On the listed ISO weekdays (1 = Monday .. 7 = Sunday).
    Weekly { weekdays: BTreeSet<u32> },
    /// On the listed days of the month, within the allowed months.
    Monthly {
        days: BTreeSet<DayOfMonth>,
        months: MonthFilter,
    },
    /// Once a year on the start date's month and day.
    Yearly,
}

/// One day token of a monthly rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfMonth {
    /// A fixed calendar day, 1..=31.
    Day(u32),
    /// The last day of the month (`-1`).
    Last,
    /// The day before the last day of the month (`-2`).
    SecondToLast,
}

impl DayOfMonth {
    /// Whether `day` matches this token in a month whose last day is `last_day`.
    pub fn matches(self, day: u32, last_day: u32) -> bool {
        match self {
            DayOfMonth::Day(n) => n == day,
            DayOfMonth::Last => day == last_day,
            DayOfMonth::SecondToLast => day + 1 == last_day,
        }
    }

    fn token(self) -> String {
        match self {
            DayOfMonth::Day(n) => n.to_string(),
            DayOfMonth::Last => "-1".to_string(),
            DayOfMonth::SecondToLast => "-2".to_string(),
        }
    }
}

/// Which months a monthly rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthFilter {
    /// No month list was given.
    #[default]
    All,
    /// Only the listed months, 1..=12.
    Only(BTreeSet<u32>),
}

impl MonthFilter {
    pub fn contains(&self, month: u32) -> bool {
        match self {
            MonthFilter::All => (1..=12).contains(&month),
            MonthFilter::Only(months) => months.contains(&month),
        }
    }

    fn months(&self) -> Vec<u32> {
        match self {
            MonthFilter::All => (1..=12).collect(),
            MonthFilter::Only(months) => months.iter().copied().collect(),
        }
    }
}

impl RecurrenceRule {
    /// Parse a rule string. Equivalent to `s.parse::<RecurrenceRule>()`.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    /// The single-letter tag that selects this rule kind.
    pub fn tag(&self) -> char {
        match self {
            RecurrenceRule::Daily { .. } => 'd',
            RecurrenceRule::Weekly { .. } => 'w',
            RecurrenceRule::Monthly { .. } => 'm',
            RecurrenceRule::Yearly => 'y',
        }
    }

    /// Check the rule's invariants.
    ///
    /// Parsing already enforces these; rules built by hand or deserialized are
    /// checked again before evaluation so the scan loops always terminate.
    pub fn validate(&self) -> Result<()> {
        match self {
            RecurrenceRule::Daily { interval_days } => {
                if !(1..=MAX_INTERVAL_DAYS).contains(interval_days) {
                    return Err(RepeatError::InvalidInterval(interval_days.to_string()));
                }
            }
            RecurrenceRule::Weekly { weekdays } => {
                if weekdays.is_empty() {
                    return Err(RepeatError::MalformedRuleParameters(
                        "weekly rule needs at least one weekday".to_string(),
                    ));
                }
                if let Some(bad) = weekdays.iter().find(|d| !(1..=7).contains(*d)) {
                    return Err(RepeatError::InvalidWeekday(bad.to_string()));
                }
            }
            RecurrenceRule::Monthly { days, months } => {
                if days.is_empty() {
                    return Err(RepeatError::MalformedRuleParameters(
                        "monthly rule needs at least one day".to_string(),
                    ));
                }
                for day in days {
                    if let DayOfMonth::Day(n) = day {
                        if !(1..=31).contains(n) {
                            return Err(RepeatError::InvalidDayOfMonth(n.to_string()));
                        }
                    }
                }
                if let MonthFilter::Only(list) = months {
                    if list.is_empty() {
                        return Err(RepeatError::MalformedRuleParameters(
                            "monthly rule month list is empty".to_string(),
                        ));
                    }
                    if let Some(bad) = list.iter().find(|m| !(1..=12).contains(*m)) {
                        return Err(RepeatError::InvalidMonth(bad.to_string()));
                    }
                }
                if !can_ever_match(days, months) {
                    return Err(RepeatError::InvalidDayOfMonth(format!(
                        "{} never occurs in months {}",
                        join_days(days),
                        join(&months.months())
                    )));
                }
            }
            RecurrenceRule::Yearly => {}
        }
        Ok(())
    }
}

/// A monthly rule matches at least once when it has a relative token, or a
/// fixed day that fits into one of its months.
fn can_ever_match(days: &BTreeSet<DayOfMonth>, months: &MonthFilter) -> bool {
    let months = months.months();
    days.iter().any(|day| match day {
        DayOfMonth::Day(n) => months
            .iter()
            .any(|m| *n <= MAX_DAYS_IN_MONTH[(*m as usize) - 1]),
        DayOfMonth::Last | DayOfMonth::SecondToLast => true,
    })
}

impl FromStr for RecurrenceRule {
    type Err = RepeatError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(RepeatError::EmptyRule);
        }

        let (tag, params) = match trimmed.split_once(char::is_whitespace) {
            Some((tag, rest)) => (tag, rest.trim()),
            None => (trimmed, ""),
        };

        let rule = match tag {
            "d" => parse_daily(params)?,
            "w" => parse_weekly(params)?,
            "m" => parse_monthly(params)?,
            "y" => parse_yearly(params)?,
            other => return Err(RepeatError::UnknownRuleKind(other.to_string())),
        };
        rule.validate()?;
        Ok(rule)
    }
}

fn parse_daily(params: &str) -> Result<RecurrenceRule> {
    if params.is_empty() {
        return Err(RepeatError::MalformedRuleParameters(
            "daily rule requires an interval in days".to_string(),
        ));
    }
    if params.split_whitespace().count() > 1 {
        return Err(RepeatError::MalformedRuleParameters(format!(
            "daily rule takes a single interval, got {:?}",
            params
        )));
    }
    let interval_days = parse_number(params, 1, i64::from(MAX_INTERVAL_DAYS))
        .ok_or_else(|| RepeatError::InvalidInterval(params.to_string()))?;
    Ok(RecurrenceRule::Daily { interval_days })
}

fn parse_weekly(params: &str) -> Result<RecurrenceRule> {
    if params.is_empty() {
        return Err(RepeatError::MalformedRuleParameters(
            "weekly rule requires a list of weekdays".to_string(),
        ));
    }
    let weekdays = params
        .split(',')
        .map(|token| {
            let token = token.trim();
            parse_number(token, 1, 7)
                .ok_or_else(|| RepeatError::InvalidWeekday(token.to_string()))
        })
        .collect::<Result<BTreeSet<u32>>>()?;
    Ok(RecurrenceRule::Weekly { weekdays })
}

fn parse_monthly(params: &str) -> Result<RecurrenceRule> {
    if params.is_empty() {
        return Err(RepeatError::MalformedRuleParameters(
            "monthly rule requires a list of days".to_string(),
        ));
    }
    let (day_part, month_part) = match params.split_once(char::is_whitespace) {
        Some((days, months)) => (days, months.trim()),
        None => (params, ""),
    };

    let days = day_part
        .split(',')
        .map(|token| {
            let token = token.trim();
            match token.parse::<i64>() {
                Ok(-1) => Ok(DayOfMonth::Last),
                Ok(-2) => Ok(DayOfMonth::SecondToLast),
                Ok(n @ 1..=31) => Ok(DayOfMonth::Day(n as u32)),
                _ => Err(RepeatError::InvalidDayOfMonth(token.to_string())),
            }
        })
        .collect::<Result<BTreeSet<DayOfMonth>>>()?;

    let months = if month_part.is_empty() {
        MonthFilter::All
    } else {
        let list = month_part
            .split(',')
            .map(|token| {
                let token = token.trim();
                parse_number(token, 1, 12)
                    .ok_or_else(|| RepeatError::InvalidMonth(token.to_string()))
            })
            .collect::<Result<BTreeSet<u32>>>()?;
        MonthFilter::Only(list)
    };

    Ok(RecurrenceRule::Monthly { days, months })
}

fn parse_yearly(params: &str) -> Result<RecurrenceRule> {
    if !params.is_empty() {
        return Err(RepeatError::MalformedRuleParameters(format!(
            "yearly rule takes no parameters, got {:?}",
            params
        )));
    }
    Ok(RecurrenceRule::Yearly)
}

/// Parse a decimal integer and accept it only inside `min..=max`.
fn parse_number(token: &str, min: i64, max: i64) -> Option<u32> {
    token
        .parse::<i64>()
        .ok()
        .filter(|n| (min..=max).contains(n))
        .and_then(|n| u32::try_from(n).ok())
}

fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn join_days(days: &BTreeSet<DayOfMonth>) -> String {
    days.iter()
        .map(|d| d.token())
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders the canonical rule string, e.g. `m 1,15,-1 1,6`.
impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceRule::Daily { interval_days } => write!(f, "d {}", interval_days),
            RecurrenceRule::Weekly { weekdays } => {
                let days: Vec<u32> = weekdays.iter().copied().collect();
                write!(f, "w {}", join(&days))
            }
            RecurrenceRule::Monthly { days, months } => {
                write!(f, "m {}", join_days(days))?;
                if let MonthFilter::Only(list) = months {
                    let list: Vec<u32> = list.iter().copied().collect();
                    write!(f, " {}", join(&list))?;
                }
                Ok(())
            }
            RecurrenceRule::Yearly => write!(f, "y"),
        }
    }
}
