//! Command-line interface definitions and argument parsing

use chrono::{NaiveDate, NaiveDateTime};
use clap::Parser;

/// Default cohort cutoff: bounds how recent an active month the cohort
/// retention matrix will report on.
const DEFAULT_CUTOFF: &str = "2023-01-31";

/// Customer retention and revenue analysis over a subscription CSV export
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file
    #[arg(short, long, default_value = "data/customers.csv")]
    pub input: String,

    /// Directory where chart PNGs are written
    #[arg(short, long, default_value = "charts")]
    pub out_dir: String,

    /// Reference date for still-active customers, YYYY-MM-DD
    /// (defaults to today)
    #[arg(long)]
    pub as_of: Option<String>,

    /// Cohort analysis cutoff date, YYYY-MM-DD
    #[arg(long, default_value = DEFAULT_CUTOFF)]
    pub cutoff: String,

    /// Skip chart rendering, printing tables only
    #[arg(long)]
    pub no_charts: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Resolve the reference date for open-ended subscriptions.
    pub fn as_of_date(&self) -> crate::Result<NaiveDateTime> {
        match &self.as_of {
            Some(raw) => parse_day(raw),
            None => Ok(chrono::Local::now().naive_local()),
        }
    }

    /// Resolve the cohort cutoff date.
    pub fn cutoff_date(&self) -> crate::Result<NaiveDateTime> {
        parse_day(&self.cutoff)
    }
}

fn parse_day(raw: &str) -> crate::Result<NaiveDateTime> {
    let day = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date '{}', expected YYYY-MM-DD", raw))?;
    day.and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("invalid date '{}'", raw))
}
