//! Retention by geography: average subscription duration ranked by
//! continent, country, and provider

use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::{duration_months, end_date};
use crate::data::Customer;
use crate::geo;

/// One ranked row: a group key and its mean subscription duration in months.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDuration {
    pub group: String,
    pub avg_duration: f64,
}

/// The three ranked tables, each sorted by mean duration descending.
#[derive(Debug)]
pub struct RetentionTables {
    pub by_continent: Vec<GroupDuration>,
    pub by_country: Vec<GroupDuration>,
    pub by_provider: Vec<GroupDuration>,
}

/// Rank average subscription duration by continent, country, and provider.
///
/// Only converted customers participate, and only those whose country maps
/// to a continent; unmapped geographies (including "UNKNOWN") are excluded
/// from all three tables so they cannot skew the ranking.
pub fn analyze(customers: &[Customer], as_of: NaiveDateTime) -> RetentionTables {
    let mut by_continent: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    let mut by_country: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    let mut by_provider: BTreeMap<String, (f64, usize)> = BTreeMap::new();

    for customer in customers {
        let conversion = match customer.conversion_date {
            Some(conversion) => conversion,
            None => continue,
        };
        let continent = match geo::continent_of(&customer.country) {
            Some(continent) => continent,
            None => continue,
        };
        let duration = duration_months(conversion, end_date(customer, as_of)) as f64;

        accumulate(&mut by_continent, continent, duration);
        accumulate(&mut by_country, &customer.country, duration);
        accumulate(&mut by_provider, &customer.provider, duration);
    }

    RetentionTables {
        by_continent: ranked(by_continent),
        by_country: ranked(by_country),
        by_provider: ranked(by_provider),
    }
}

fn accumulate(groups: &mut BTreeMap<String, (f64, usize)>, key: &str, duration: f64) {
    let entry = groups.entry(key.to_string()).or_insert((0.0, 0));
    entry.0 += duration;
    entry.1 += 1;
}

/// Collapse sums to means and sort descending. The stable sort over the
/// BTreeMap's ascending keys leaves ties ordered by group key.
fn ranked(groups: BTreeMap<String, (f64, usize)>) -> Vec<GroupDuration> {
    let mut rows: Vec<GroupDuration> = groups
        .into_iter()
        .map(|(group, (sum, count))| GroupDuration {
            group,
            avg_duration: sum / count as f64,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.avg_duration
            .partial_cmp(&a.avg_duration)
            .unwrap_or(Ordering::Equal)
    });
    rows
}
