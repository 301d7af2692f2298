//! CSV ingestion and the record cleaning pipeline
//!
//! The raw export is untyped text. Cleaning runs six ordered steps:
//! required-field filter, defaulting, country normalization, type
//! coercion, deduplication, and a temporal consistency filter. Invalid
//! rows are excluded without raising; only a missing file or a missing
//! required column aborts the run.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::geo;

/// Column headers the export must carry. Absence of any is a fatal
/// startup error, not a per-row problem.
const REQUIRED_COLUMNS: [&str; 12] = [
    "oid",
    "provider",
    "signup_date",
    "conversion_date",
    "cancellation_date",
    "total_charges",
    "current_mrr",
    "is_canceled",
    "is_active",
    "is_delinquent",
    "converted",
    "personal_person_geo_country",
];

/// One row of the raw export, everything still text. Empty cells
/// deserialize to `None`.
#[derive(Debug, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "oid")]
    pub id: Option<String>,
    pub provider: Option<String>,
    pub signup_date: Option<String>,
    pub conversion_date: Option<String>,
    pub cancellation_date: Option<String>,
    pub total_charges: Option<String>,
    pub current_mrr: Option<String>,
    pub is_canceled: Option<String>,
    pub is_active: Option<String>,
    pub is_delinquent: Option<String>,
    pub converted: Option<String>,
    #[serde(rename = "personal_person_geo_country")]
    pub country: Option<String>,
}

/// A cleaned customer record.
///
/// "Required" fields were present in the raw export; coercion failures
/// afterwards degrade a value to `None` rather than dropping the row, so
/// dates and money stay optional. Absence is a first-class state, never a
/// sentinel date or zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: String,
    pub provider: String,
    pub signup_date: Option<NaiveDateTime>,
    pub conversion_date: Option<NaiveDateTime>,
    pub cancellation_date: Option<NaiveDateTime>,
    pub total_charges: Option<f64>,
    pub current_mrr: Option<f64>,
    pub is_canceled: bool,
    pub is_active: bool,
    pub is_delinquent: bool,
    pub converted: bool,
    /// Normalized country name, defaulted to "UNKNOWN" when missing.
    pub country: String,
}

impl Customer {
    /// Hashable view of every field, for exact-duplicate removal.
    fn dedup_key(&self) -> impl std::hash::Hash + Eq {
        (
            self.id.clone(),
            self.provider.clone(),
            self.signup_date,
            self.conversion_date,
            self.cancellation_date,
            self.total_charges.map(f64::to_bits),
            self.current_mrr.map(f64::to_bits),
            self.is_canceled,
            self.is_active,
            self.is_delinquent,
            self.converted,
            self.country.clone(),
        )
    }

    /// Temporal ordering holds: conversion not before signup,
    /// cancellation not before conversion. Comparisons are only made
    /// when both operands are present; absence never fails a row here.
    fn dates_consistent(&self) -> bool {
        if let (Some(conversion), Some(signup)) = (self.conversion_date, self.signup_date) {
            if conversion < signup {
                return false;
            }
        }
        if let (Some(cancellation), Some(conversion)) =
            (self.cancellation_date, self.conversion_date)
        {
            if cancellation < conversion {
                return false;
            }
        }
        true
    }
}

/// Load the export and run the full cleaning pipeline.
///
/// # Arguments
/// * `path` - Path to the CSV export
///
/// # Returns
/// * Cleaned customer records; empty when every raw row was invalid
pub fn load_customers<P: AsRef<Path>>(path: P) -> crate::Result<Vec<Customer>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| anyhow::anyhow!("cannot open input file {}: {}", path.display(), e))?;

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            anyhow::bail!("input file {} is missing column '{}'", path.display(), column);
        }
    }

    // Rows that fail to deserialize at all are malformed rows, excluded
    // like any other invalid row.
    let raw: Vec<RawRecord> = reader.deserialize().filter_map(|row| row.ok()).collect();

    Ok(clean_records(raw))
}

/// Run the six cleaning steps over already-parsed raw rows.
pub fn clean_records(rows: Vec<RawRecord>) -> Vec<Customer> {
    // Steps 1-4: per-row filter, default, normalize, coerce.
    let mut customers: Vec<Customer> = rows.into_iter().filter_map(coerce_row).collect();

    // Step 5: exact duplicates collapse to their first occurrence.
    let mut seen = HashSet::new();
    customers.retain(|customer| seen.insert(customer.dedup_key()));

    // Step 6: both temporal predicates are evaluated per row against the
    // same deduplicated snapshot in one pass, so dropping one row can
    // never rescue another.
    customers.retain(Customer::dates_consistent);

    customers
}

/// Steps 1-4 for a single row. `None` means the row is excluded.
fn coerce_row(raw: RawRecord) -> Option<Customer> {
    // Step 1: required-field filter. Flags that do not parse as booleans
    // count as missing.
    let id = non_empty(raw.id)?;
    let provider = non_empty(raw.provider)?;
    let signup_raw = non_empty(raw.signup_date)?;
    let total_charges_raw = non_empty(raw.total_charges)?;
    let current_mrr_raw = non_empty(raw.current_mrr)?;
    let is_canceled = parse_flag(&non_empty(raw.is_canceled)?)?;
    let is_active = parse_flag(&non_empty(raw.is_active)?)?;
    let is_delinquent = parse_flag(&non_empty(raw.is_delinquent)?)?;
    let converted = parse_flag(&non_empty(raw.converted)?)?;

    // Steps 2-3: default and normalize the country.
    let country = geo::normalize_country(raw.country.as_deref().unwrap_or("UNKNOWN"));

    // Step 4: coercion. Failures become absent values, not dropped rows.
    Some(Customer {
        id,
        provider,
        signup_date: parse_timestamp(&signup_raw),
        conversion_date: raw.conversion_date.as_deref().and_then(parse_timestamp),
        cancellation_date: raw.cancellation_date.as_deref().and_then(parse_timestamp),
        total_charges: parse_money(&total_charges_raw),
        current_mrr: parse_money(&current_mrr_raw),
        is_canceled,
        is_active,
        is_delinquent,
        converted,
        country,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn parse_money(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a timestamp in any of the export's formats, discarding any
/// timezone offset (the wall-clock time is kept).
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_local());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_row() -> RawRecord {
        RawRecord {
            id: Some("c-1".to_string()),
            provider: Some("stripe".to_string()),
            signup_date: Some("2022-01-01".to_string()),
            conversion_date: Some("2022-02-01".to_string()),
            cancellation_date: None,
            total_charges: Some("120.0".to_string()),
            current_mrr: Some("15.0".to_string()),
            is_canceled: Some("False".to_string()),
            is_active: Some("True".to_string()),
            is_delinquent: Some("False".to_string()),
            converted: Some("True".to_string()),
            country: Some("United States of America".to_string()),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_valid_row_survives_cleaning() {
        let cleaned = clean_records(vec![raw_row()]);
        assert_eq!(cleaned.len(), 1);
        let customer = &cleaned[0];
        assert_eq!(customer.id, "c-1");
        assert_eq!(customer.country, "UNITED STATES");
        assert_eq!(customer.signup_date, Some(day(2022, 1, 1)));
        assert_eq!(customer.conversion_date, Some(day(2022, 2, 1)));
        assert_eq!(customer.cancellation_date, None);
        assert_eq!(customer.total_charges, Some(120.0));
        assert!(customer.converted);
    }

    #[test]
    fn test_missing_required_field_drops_row() {
        let mut missing_id = raw_row();
        missing_id.id = None;
        let mut blank_provider = raw_row();
        blank_provider.provider = Some("  ".to_string());
        let mut bad_flag = raw_row();
        bad_flag.is_delinquent = Some("maybe".to_string());

        assert!(clean_records(vec![missing_id, blank_provider, bad_flag]).is_empty());
    }

    #[test]
    fn test_all_malformed_input_yields_empty_set() {
        let rows: Vec<RawRecord> = (0..5)
            .map(|_| {
                let mut row = raw_row();
                row.signup_date = None;
                row
            })
            .collect();
        assert!(clean_records(rows).is_empty());
    }

    #[test]
    fn test_missing_country_defaults_to_unknown() {
        let mut row = raw_row();
        row.country = None;
        let cleaned = clean_records(vec![row]);
        assert_eq!(cleaned[0].country, "UNKNOWN");
    }

    #[test]
    fn test_unparseable_values_become_absent_not_dropped() {
        let mut row = raw_row();
        row.conversion_date = Some("soon".to_string());
        row.total_charges = Some("lots".to_string());
        let cleaned = clean_records(vec![row]);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].conversion_date, None);
        assert_eq!(cleaned[0].total_charges, None);
    }

    #[test]
    fn test_timezone_offset_is_stripped() {
        let mut row = raw_row();
        row.signup_date = Some("2022-01-01T08:30:00+05:00".to_string());
        let cleaned = clean_records(vec![row]);
        assert_eq!(
            cleaned[0].signup_date,
            NaiveDate::from_ymd_opt(2022, 1, 1)
                .unwrap()
                .and_hms_opt(8, 30, 0)
        );
    }

    #[test]
    fn test_duplicates_collapse_to_one() {
        let cleaned = clean_records(vec![raw_row(), raw_row()]);
        assert_eq!(cleaned.len(), 1);
    }

    #[test]
    fn test_near_duplicates_are_kept() {
        let mut other = raw_row();
        other.id = Some("c-2".to_string());
        let cleaned = clean_records(vec![raw_row(), other]);
        assert_eq!(cleaned.len(), 2);
    }

    #[test]
    fn test_conversion_before_signup_drops_row() {
        let mut row = raw_row();
        row.signup_date = Some("2023-01-01".to_string());
        row.conversion_date = Some("2022-12-01".to_string());
        assert!(clean_records(vec![row]).is_empty());
    }

    #[test]
    fn test_cancellation_before_conversion_drops_row() {
        let mut row = raw_row();
        row.cancellation_date = Some("2022-01-15".to_string());
        assert!(clean_records(vec![row]).is_empty());
    }

    #[test]
    fn test_absent_conversion_never_triggers_temporal_drop() {
        let mut row = raw_row();
        row.conversion_date = Some("never".to_string());
        row.cancellation_date = Some("2021-06-01".to_string());
        let cleaned = clean_records(vec![row]);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].conversion_date, None);
    }
}
