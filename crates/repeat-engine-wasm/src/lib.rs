//! WASM bindings for repeat-engine.
//!
//! Exposes next-date computation and task roll-forward to JavaScript via
//! `wasm-bindgen`. Dates cross the boundary as `YYYYMMDD` strings; structured
//! results are passed as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p repeat-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/repeat-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/repeat_engine_wasm.wasm
//! ```

use chrono::{Local, NaiveDate};
use repeat_engine::{Completion, RecurrenceRule};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse the optional `now` argument; empty or missing means today.
fn parse_now(now: Option<String>) -> Result<NaiveDate, JsValue> {
    match now.as_deref() {
        Some(raw) if !raw.is_empty() => repeat_engine::parse_date(raw)
            .map_err(|e| JsValue::from_str(&format!("Invalid 'now' parameter: {}", e))),
        _ => Ok(Local::now().date_naive()),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn js_err(e: repeat_engine::RepeatError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute the next occurrence of a repeating task.
///
/// # Arguments
/// - `now` -- Optional reference date, `YYYYMMDD` (defaults to today)
/// - `date` -- Task start date, `YYYYMMDD`
/// - `repeat` -- Repeat rule (e.g., "d 7", "w 1,3", "m -1", "y")
#[wasm_bindgen(js_name = "nextDate")]
pub fn next_date(now: Option<String>, date: &str, repeat: &str) -> Result<String, JsValue> {
    let now = parse_now(now)?;
    repeat_engine::next_date(&now, date, repeat).map_err(js_err)
}

/// The `YYYYMMDD` date a new task should be stored with.
#[wasm_bindgen(js_name = "resolveTaskDate")]
pub fn resolve_task_date(
    now: Option<String>,
    date: &str,
    repeat: &str,
) -> Result<String, JsValue> {
    let now = parse_now(now)?;
    repeat_engine::resolve_task_date(&now, date, repeat).map_err(js_err)
}

/// Outcome of marking a task done, as JSON:
/// `{"action":"remove"}` or `{"action":"reschedule","date":"YYYYMMDD"}`.
#[wasm_bindgen(js_name = "completeTask")]
pub fn complete_task(now: Option<String>, date: &str, repeat: &str) -> Result<String, JsValue> {
    let now = parse_now(now)?;
    let completion: Completion =
        repeat_engine::complete_task(&now, date, repeat).map_err(js_err)?;
    to_json(&completion)
}

/// Parse a repeat rule and return its structure as JSON.
#[wasm_bindgen(js_name = "parseRule")]
pub fn parse_rule(rule: &str) -> Result<String, JsValue> {
    let parsed = RecurrenceRule::parse(rule).map_err(js_err)?;
    to_json(&parsed)
}
