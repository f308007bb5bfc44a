//! Error types for repeat-engine operations.

use thiserror::Error;

/// Every way computing a next date can fail.
///
/// Each variant carries the offending input so the caller can echo it back
/// in a client-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepeatError {
    #[error("incorrect date format: {0:?} (expected YYYYMMDD)")]
    InvalidDateFormat(String),

    #[error("empty repeat rule")]
    EmptyRule,

    #[error("unknown repeat rule kind: {0:?}")]
    UnknownRuleKind(String),

    #[error("incorrect interval in daily rule: {0:?} (must be between 1 and 400)")]
    InvalidInterval(String),

    #[error("incorrect day of week: {0:?} (must be between 1 and 7)")]
    InvalidWeekday(String),

    #[error("incorrect day of month: {0:?}")]
    InvalidDayOfMonth(String),

    #[error("incorrect month: {0:?} (must be between 1 and 12)")]
    InvalidMonth(String),

    #[error("malformed repeat rule parameters: {0}")]
    MalformedRuleParameters(String),

    #[error("date out of range: {0}")]
    DateOutOfRange(String),
}

pub type Result<T> = std::result::Result<T, RepeatError>;
