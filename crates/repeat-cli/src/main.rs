//! `nextdate` CLI — compute next dates for repeating tasks from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Next occurrence after today
//! nextdate next --date 20240101 --repeat "w 1,3"
//!
//! # Next occurrence after a fixed reference date
//! nextdate next --now 20240110 --date 20240101 --repeat "d 5"
//!
//! # Date a new task would be stored with
//! nextdate resolve --date 20230101 --repeat "m -1"
//!
//! # What happens when a task is marked done ("remove" or the new date)
//! nextdate done --date 20240101 --repeat y
//!
//! # Inspect how a rule parses
//! nextdate parse "m 1,15,-1 1,6"
//! ```
//!
//! The reference date defaults to the local calendar day and can also be set
//! through `NEXTDATE_NOW`. Diagnostics go to stderr, filtered by `RUST_LOG`.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use repeat_engine::{Completion, RecurrenceRule};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "nextdate",
    version,
    about = "Next-date calculator for repeating tasks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the first date after NOW produced by the repeat rule
    Next {
        /// Reference date, YYYYMMDD (defaults to today)
        #[arg(long, env = "NEXTDATE_NOW")]
        now: Option<String>,
        /// Task start date, YYYYMMDD
        #[arg(short, long)]
        date: String,
        /// Repeat rule, e.g. "d 7", "w 1,3", "m -1 1,6", "y"
        #[arg(short, long)]
        repeat: String,
    },
    /// Print the date a new task would be stored with
    Resolve {
        /// Reference date, YYYYMMDD (defaults to today)
        #[arg(long, env = "NEXTDATE_NOW")]
        now: Option<String>,
        /// Requested task date, YYYYMMDD (empty means today)
        #[arg(short, long, default_value = "")]
        date: String,
        /// Repeat rule (empty for a one-off task)
        #[arg(short, long, default_value = "")]
        repeat: String,
    },
    /// Print what happens to a task marked done: "remove" or its new date
    Done {
        /// Reference date, YYYYMMDD (defaults to today)
        #[arg(long, env = "NEXTDATE_NOW")]
        now: Option<String>,
        /// Current task date, YYYYMMDD
        #[arg(short, long)]
        date: String,
        /// Repeat rule (empty for a one-off task)
        #[arg(short, long, default_value = "")]
        repeat: String,
    },
    /// Parse a repeat rule and print it as JSON
    Parse {
        /// Repeat rule text
        rule: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Next { now, date, repeat } => {
            let now = reference_date(now.as_deref())?;
            let next = repeat_engine::next_date(&now, &date, &repeat)
                .with_context(|| format!("Failed to compute next date for rule {:?}", repeat))?;
            println!("{}", next);
        }
        Commands::Resolve { now, date, repeat } => {
            let now = reference_date(now.as_deref())?;
            let resolved = repeat_engine::resolve_task_date(&now, &date, &repeat)
                .context("Failed to resolve task date")?;
            println!("{}", resolved);
        }
        Commands::Done { now, date, repeat } => {
            let now = reference_date(now.as_deref())?;
            match repeat_engine::complete_task(&now, &date, &repeat)
                .context("Failed to complete task")?
            {
                Completion::Remove => println!("remove"),
                Completion::Reschedule(next) => println!("{}", next),
            }
        }
        Commands::Parse { rule } => {
            let parsed = RecurrenceRule::parse(&rule)
                .with_context(|| format!("Failed to parse rule {:?}", rule))?;
            let pretty = serde_json::to_string_pretty(&parsed)?;
            println!("{}", pretty);
        }
    }

    Ok(())
}

/// Resolve the `--now` argument, falling back to the local calendar day.
fn reference_date(now: Option<&str>) -> Result<NaiveDate> {
    match now {
        Some(raw) if !raw.is_empty() => repeat_engine::parse_date(raw)
            .with_context(|| format!("Invalid 'now' parameter: {:?}", raw)),
        _ => {
            let today = Local::now().date_naive();
            debug!(%today, "no reference date given, using today");
            Ok(today)
        }
    }
}
