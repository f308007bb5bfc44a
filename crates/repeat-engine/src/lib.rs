//! # repeat-engine
//!
//! Next-date computation for repeating tasks.
//!
//! Given a task's stored date (`YYYYMMDD`), a compact repeat rule and a
//! reference "now", the engine finds the first date the rule produces that
//! falls on a calendar day strictly after "now". Everything is pure and
//! synchronous; the rule is re-parsed on every string-level call.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use repeat_engine::next_date;
//!
//! let now = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
//! assert_eq!(next_date(&now, "20240101", "d 5").unwrap(), "20240111");
//! ```
//!
//! ## Modules
//!
//! - [`rule`] — rule text → [`RecurrenceRule`]
//! - [`evaluate`] — daily, weekly, monthly and yearly evaluators
//! - [`dispatch`] — string entry points ([`next_date`], [`next_date_str`])
//! - [`task`] — roll-forward when a task is created or completed
//! - [`date`] — `YYYYMMDD` format and calendar-day ordering
//! - [`error`] — Error types

pub mod date;
pub mod dispatch;
pub mod error;
pub mod evaluate;
pub mod rule;
pub mod task;

pub use date::{format_date, is_strictly_after, parse_date, CalendarDate, DATE_FORMAT};
pub use dispatch::{next_date, next_date_str};
pub use error::RepeatError;
pub use rule::{DayOfMonth, MonthFilter, RecurrenceRule};
pub use task::{complete_task, resolve_task_date, Completion};
