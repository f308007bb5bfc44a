//! Tests for the `next_date` dispatcher and the four rule evaluators.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use repeat_engine::{next_date, next_date_str, RepeatError};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn next(now: &str, start: &str, rule: &str) -> Result<String, RepeatError> {
    next_date_str(now, start, rule)
}

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn daily_every_five_days_after_reference() {
    // Jan 6 is not after Jan 10, Jan 11 is.
    assert_eq!(next("20240110", "20240101", "d 5").unwrap(), "20240111");
}

#[test]
fn weekly_monday_wednesday_from_a_monday() {
    // 2024-01-01 is a Monday; the start day itself is not after now.
    assert_eq!(next("20240101", "20240101", "w 1,3").unwrap(), "20240103");
}

#[test]
fn monthly_last_day_of_january() {
    assert_eq!(next("20240115", "20240101", "m -1").unwrap(), "20240131");
}

#[test]
fn daily_interval_above_limit_is_rejected() {
    assert_eq!(
        next("20240101", "20240101", "d 500"),
        Err(RepeatError::InvalidInterval("500".to_string()))
    );
}

// ---------------------------------------------------------------------------
// Daily
// ---------------------------------------------------------------------------

#[test]
fn daily_always_steps_at_least_once() {
    // Start far in the future: still one interval later, never the start itself.
    assert_eq!(next("20240101", "20300101", "d 1").unwrap(), "20300102");
}

#[test]
fn daily_from_same_day() {
    assert_eq!(next("20240101", "20240101", "d 1").unwrap(), "20240102");
}

#[test]
fn daily_start_after_now() {
    assert_eq!(next("20231201", "20240101", "d 7").unwrap(), "20240108");
}

#[test]
fn daily_crosses_leap_day() {
    // Feb 2024 has 29 days: Feb 1 + 30 = Mar 2.
    assert_eq!(next("20240215", "20240201", "d 30").unwrap(), "20240302");
}

#[test]
fn daily_crosses_year_boundary() {
    assert_eq!(next("20241230", "20241201", "d 10").unwrap(), "20241231");
    assert_eq!(next("20241231", "20241201", "d 10").unwrap(), "20250110");
}

#[test]
fn daily_far_in_the_past_lands_on_interval_grid() {
    // 2000-01-01 + 400 * 22 days = 2024-02-04; + 400 * 21 = 2022-12-31.
    assert_eq!(next("20240101", "20000101", "d 400").unwrap(), "20240204");
}

#[test]
fn daily_maximum_interval() {
    assert_eq!(next("20240101", "20240101", "d 400").unwrap(), "20250204");
}

// ---------------------------------------------------------------------------
// Weekly
// ---------------------------------------------------------------------------

#[test]
fn weekly_sunday_is_seven() {
    // 2024-01-07 is a Sunday.
    assert_eq!(next("20240101", "20240101", "w 7").unwrap(), "20240107");
}

#[test]
fn weekly_same_weekday_skips_a_week() {
    assert_eq!(next("20240101", "20240101", "w 1").unwrap(), "20240108");
}

#[test]
fn weekly_may_return_future_start_date() {
    // 2024-06-01 is a Saturday and already after now.
    assert_eq!(next("20240101", "20240601", "w 6").unwrap(), "20240601");
    assert_eq!(next("20240101", "20240601", "w 7").unwrap(), "20240602");
}

#[test]
fn weekly_start_in_the_past_scans_from_now() {
    // 2024-03-15 is a Friday; the next Tuesday is Mar 19.
    assert_eq!(next("20240315", "20200101", "w 2").unwrap(), "20240319");
}

#[test]
fn weekly_tolerates_spaces_around_commas() {
    assert_eq!(next("20240101", "20240101", "w 3, 5").unwrap(), "20240103");
}

#[test]
fn weekly_crosses_year_boundary() {
    // 2024-12-31 is a Tuesday; the next Monday is 2025-01-06.
    assert_eq!(next("20241231", "20241201", "w 1").unwrap(), "20250106");
}

// ---------------------------------------------------------------------------
// Monthly
// ---------------------------------------------------------------------------

#[test]
fn monthly_fixed_day_rolls_into_next_year() {
    assert_eq!(next("20241215", "20241215", "m 1").unwrap(), "20250101");
}

#[test]
fn monthly_last_day_in_december_rolls_to_january() {
    assert_eq!(next("20241231", "20241201", "m -1").unwrap(), "20250131");
    assert_eq!(next("20241230", "20241201", "m -1").unwrap(), "20241231");
}

#[test]
fn monthly_second_to_last_day_in_december() {
    assert_eq!(next("20241201", "20241201", "m -2").unwrap(), "20241230");
}

#[test]
fn monthly_second_to_last_day_of_february() {
    assert_eq!(next("20240201", "20240201", "m -2").unwrap(), "20240228");
    assert_eq!(next("20230201", "20230201", "m -2").unwrap(), "20230227");
}

#[test]
fn monthly_last_day_of_february_leap_and_common() {
    assert_eq!(next("20230101", "20230101", "m -1 2").unwrap(), "20230228");
    assert_eq!(next("20240101", "20240101", "m -1 2").unwrap(), "20240229");
}

#[test]
fn monthly_day_31_skips_short_months() {
    // April has 30 days.
    assert_eq!(next("20240401", "20240401", "m 31").unwrap(), "20240531");
}

#[test]
fn monthly_day_30_skips_february() {
    assert_eq!(next("20240201", "20240201", "m 30").unwrap(), "20240330");
}

#[test]
fn monthly_excluded_months_skip_across_year_boundary() {
    // November and December are excluded; January 2025 is the next allowed month.
    assert_eq!(next("20241120", "20241120", "m 15 1").unwrap(), "20250115");
}

#[test]
fn monthly_only_december_waits_a_year() {
    assert_eq!(next("20241201", "20241201", "m 1 12").unwrap(), "20251201");
}

#[test]
fn monthly_multiple_days_and_months() {
    // Days 1 and 15 in March and June.
    assert_eq!(
        next("20240101", "20240101", "m 1,15 3,6").unwrap(),
        "20240301"
    );
    assert_eq!(
        next("20240301", "20240101", "m 1,15 3,6").unwrap(),
        "20240315"
    );
    assert_eq!(
        next("20240315", "20240101", "m 1,15 3,6").unwrap(),
        "20240601"
    );
}

#[test]
fn monthly_fixed_and_last_day_mixed() {
    assert_eq!(next("20240115", "20240115", "m 1,-1").unwrap(), "20240131");
    assert_eq!(next("20240131", "20240115", "m 1,-1").unwrap(), "20240201");
}

#[test]
fn monthly_day_29_in_february_waits_for_leap_year() {
    assert_eq!(next("20230101", "20230101", "m 29 2").unwrap(), "20240229");
}

#[test]
fn monthly_start_in_future_can_match_itself() {
    assert_eq!(next("20240101", "20240315", "m 15").unwrap(), "20240315");
}

// ---------------------------------------------------------------------------
// Yearly
// ---------------------------------------------------------------------------

#[test]
fn yearly_leap_day_into_common_year_is_march_first() {
    assert_eq!(next("20230101", "20200229", "y").unwrap(), "20230301");
}

#[test]
fn yearly_leap_day_returns_in_next_leap_year() {
    assert_eq!(next("20230401", "20200229", "y").unwrap(), "20240229");
}

#[test]
fn yearly_leap_day_century_rule() {
    // 2100 is not a leap year, 2000 was.
    assert_eq!(next("20991231", "20960229", "y").unwrap(), "21000301");
    assert_eq!(next("19990401", "19960229", "y").unwrap(), "20000229");
}

#[test]
fn yearly_always_adds_at_least_one_year() {
    assert_eq!(next("20240101", "20240101", "y").unwrap(), "20250101");
    assert_eq!(next("20230101", "20240101", "y").unwrap(), "20250101");
}

#[test]
fn yearly_catches_up_to_now() {
    assert_eq!(next("20240615", "20101231", "y").unwrap(), "20241231");
    assert_eq!(next("20241231", "20101231", "y").unwrap(), "20251231");
}

// ---------------------------------------------------------------------------
// Reference dates with a time of day
// ---------------------------------------------------------------------------

#[test]
fn time_of_day_in_now_is_ignored() {
    let late: NaiveDateTime = ymd(2024, 1, 10).and_hms_opt(23, 59, 0).unwrap();
    let early: NaiveDateTime = ymd(2024, 1, 10).and_hms_opt(0, 1, 0).unwrap();
    assert_eq!(next_date(&late, "20240101", "d 5").unwrap(), "20240111");
    assert_eq!(next_date(&early, "20240101", "d 5").unwrap(), "20240111");
}

#[test]
fn zoned_now_uses_its_calendar_day() {
    let now = Utc.with_ymd_and_hms(2024, 1, 15, 18, 30, 0).unwrap();
    assert_eq!(next_date(&now, "20240101", "m -1").unwrap(), "20240131");
}

// ---------------------------------------------------------------------------
// Dispatcher errors
// ---------------------------------------------------------------------------

#[test]
fn malformed_start_date_is_rejected() {
    for bad in [
        "2024-01-01",
        "2024011",
        "202401011",
        "20241301",
        "20240230",
        "abcdefgh",
        "",
    ] {
        assert_eq!(
            next("20240101", bad, "d 1"),
            Err(RepeatError::InvalidDateFormat(bad.to_string())),
            "start date {:?}",
            bad
        );
    }
}

#[test]
fn start_date_is_checked_before_rule() {
    assert_eq!(
        next("20240101", "bad", ""),
        Err(RepeatError::InvalidDateFormat("bad".to_string()))
    );
}

#[test]
fn empty_rule_is_rejected() {
    assert_eq!(
        next("20240101", "20240101", ""),
        Err(RepeatError::EmptyRule)
    );
    assert_eq!(
        next("20240101", "20240101", "   "),
        Err(RepeatError::EmptyRule)
    );
}

#[test]
fn unknown_rule_kind_is_rejected() {
    assert_eq!(
        next("20240101", "20240101", "x 1"),
        Err(RepeatError::UnknownRuleKind("x".to_string()))
    );
    assert_eq!(
        next("20240101", "20240101", "D 1"),
        Err(RepeatError::UnknownRuleKind("D".to_string()))
    );
}

#[test]
fn malformed_reference_date_is_rejected() {
    assert_eq!(
        next("yesterday", "20240101", "d 1"),
        Err(RepeatError::InvalidDateFormat("yesterday".to_string()))
    );
}

#[test]
fn error_messages_carry_the_offending_input() {
    let err = next("20240101", "20240101", "w 9").unwrap_err();
    assert!(err.to_string().contains('9'), "message: {}", err);
}

// ---------------------------------------------------------------------------
// End of the 8-digit range
// ---------------------------------------------------------------------------

#[test]
fn last_representable_day_is_still_formatted() {
    assert_eq!(next("99991230", "99991201", "m -1").unwrap(), "99991231");
    assert_eq!(next("99991230", "99991230", "d 1").unwrap(), "99991231");
}

#[test]
fn daily_past_year_9999_is_out_of_range() {
    assert!(matches!(
        next("99991231", "99991231", "d 400"),
        Err(RepeatError::DateOutOfRange(_))
    ));
}

#[test]
fn yearly_past_year_9999_is_out_of_range() {
    assert!(matches!(
        next("99991231", "99990615", "y"),
        Err(RepeatError::DateOutOfRange(_))
    ));
}

#[test]
fn monthly_past_year_9999_is_out_of_range() {
    assert!(matches!(
        next("99991231", "99991201", "m -1"),
        Err(RepeatError::DateOutOfRange(_))
    ));
}
