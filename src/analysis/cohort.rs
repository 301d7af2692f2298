//! Cohort retention: for each conversion-month cohort, the share of its
//! customers still active in each calendar month

use chrono::NaiveDateTime;
use ndarray::Array2;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::{active_months, Month};
use crate::data::Customer;

/// Row-normalized retention matrix for heatmap rendering.
///
/// Rows are cohort months ascending, columns are active months ascending,
/// and each cell is the fraction (0.0-1.0) of the cohort's distinct
/// customers active in that month.
#[derive(Debug)]
pub struct CohortMatrix {
    pub cohorts: Vec<Month>,
    pub active: Vec<Month>,
    pub retention: Array2<f64>,
}

impl CohortMatrix {
    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty() || self.active.is_empty()
    }
}

/// Build the normalized cohort retention matrix.
///
/// Each converted customer fans out into one (cohort, month) pair per
/// calendar month they were active, bounded by `min(end_date, cutoff)`.
/// Cohort size counts distinct customers per conversion month, including
/// those whose activity falls entirely past the cutoff.
pub fn analyze(customers: &[Customer], as_of: NaiveDateTime, cutoff: NaiveDateTime) -> CohortMatrix {
    let mut cohort_members: BTreeMap<Month, HashSet<&str>> = BTreeMap::new();
    let mut cell_members: BTreeMap<(Month, Month), HashSet<&str>> = BTreeMap::new();

    for customer in customers {
        let conversion = match customer.conversion_date {
            Some(conversion) => conversion,
            None => continue,
        };
        let cohort = Month::of(conversion);
        cohort_members
            .entry(cohort)
            .or_default()
            .insert(customer.id.as_str());

        // Lazy fan-out: fold each month straight into the counting maps
        // without materializing the exploded rows.
        if let Some(months) = active_months(customer, as_of, cutoff) {
            for month in months {
                cell_members
                    .entry((cohort, month))
                    .or_default()
                    .insert(customer.id.as_str());
            }
        }
    }

    let cohorts: Vec<Month> = cohort_members.keys().copied().collect();
    let active: Vec<Month> = cell_members
        .keys()
        .map(|(_, month)| *month)
        .collect::<BTreeSet<Month>>()
        .into_iter()
        .collect();

    let mut retention = Array2::zeros((cohorts.len(), active.len()));
    for ((cohort, month), members) in &cell_members {
        let row = match cohorts.binary_search(cohort) {
            Ok(row) => row,
            Err(_) => continue,
        };
        let col = match active.binary_search(month) {
            Ok(col) => col,
            Err(_) => continue,
        };
        let size = cohort_members
            .get(cohort)
            .map(|ids| ids.len())
            .unwrap_or(0);
        let rate = members.len() as f64 / size as f64;
        // A zero-size cohort is undefined, not an error.
        retention[[row, col]] = if rate.is_finite() { rate } else { 0.0 };
    }

    CohortMatrix {
        cohorts,
        active,
        retention,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn customer(
        id: &str,
        conversion: NaiveDateTime,
        cancellation: Option<NaiveDateTime>,
    ) -> Customer {
        Customer {
            id: id.to_string(),
            provider: "stripe".to_string(),
            signup_date: Some(at(2021, 12, 1)),
            conversion_date: Some(conversion),
            cancellation_date: cancellation,
            total_charges: Some(100.0),
            current_mrr: Some(10.0),
            is_canceled: cancellation.is_some(),
            is_active: cancellation.is_none(),
            is_delinquent: false,
            converted: true,
            country: "FRANCE".to_string(),
        }
    }

    #[test]
    fn test_two_customer_january_cohort() {
        // One customer active through March, one canceling within January.
        let customers = vec![
            customer("a", at(2023, 1, 5), Some(at(2023, 3, 20))),
            customer("b", at(2023, 1, 10), Some(at(2023, 1, 25))),
        ];
        let matrix = analyze(&customers, at(2023, 6, 1), at(2023, 12, 31));

        assert_eq!(matrix.cohorts, vec![Month { year: 2023, month: 1 }]);
        assert_eq!(matrix.active.len(), 3); // Jan, Feb, Mar
        assert_eq!(matrix.retention[[0, 0]], 1.0); // 2 of 2 in January
        assert_eq!(matrix.retention[[0, 1]], 0.5); // 1 of 2 in February
        assert_eq!(matrix.retention[[0, 2]], 0.5);
    }

    #[test]
    fn test_cutoff_bounds_active_months() {
        let customers = vec![customer("a", at(2022, 11, 1), None)];
        let matrix = analyze(&customers, at(2023, 6, 1), at(2023, 1, 31));

        // Open-ended subscription runs to the cutoff, not to `as_of`.
        let labels: Vec<String> = matrix.active.iter().map(Month::to_string).collect();
        assert_eq!(labels, ["2022-11", "2022-12", "2023-01"]);
    }

    #[test]
    fn test_conversion_past_cutoff_counts_toward_cohort_size_only() {
        let customers = vec![
            customer("a", at(2023, 1, 5), None),
            // Converted after the cutoff: empty month sequence, but still
            // a member of the March cohort.
            customer("b", at(2023, 3, 5), None),
        ];
        let matrix = analyze(&customers, at(2023, 6, 1), at(2023, 1, 31));

        assert_eq!(matrix.cohorts.len(), 2);
        assert_eq!(matrix.active, vec![Month { year: 2023, month: 1 }]);
        assert_eq!(matrix.retention[[0, 0]], 1.0);
        assert_eq!(matrix.retention[[1, 0]], 0.0); // March cohort never observed
    }

    #[test]
    fn test_cohorts_and_months_sorted_ascending() {
        let customers = vec![
            customer("late", at(2022, 9, 1), Some(at(2022, 10, 15))),
            customer("early", at(2022, 3, 1), Some(at(2022, 4, 15))),
        ];
        let matrix = analyze(&customers, at(2023, 6, 1), at(2023, 1, 31));

        let cohorts: Vec<String> = matrix.cohorts.iter().map(Month::to_string).collect();
        assert_eq!(cohorts, ["2022-03", "2022-09"]);
        let active: Vec<String> = matrix.active.iter().map(Month::to_string).collect();
        assert_eq!(active, ["2022-03", "2022-04", "2022-09", "2022-10"]);
    }

    #[test]
    fn test_empty_input_yields_empty_matrix() {
        let matrix = analyze(&[], at(2023, 6, 1), at(2023, 1, 31));
        assert!(matrix.is_empty());
        assert_eq!(matrix.retention.shape(), &[0, 0]);
    }

    #[test]
    fn test_duplicate_ids_counted_once() {
        let customers = vec![
            customer("a", at(2023, 1, 5), Some(at(2023, 2, 20))),
            customer("a", at(2023, 1, 7), Some(at(2023, 1, 20))),
        ];
        let matrix = analyze(&customers, at(2023, 6, 1), at(2023, 12, 31));
        // Same customer id twice still yields a cohort of one.
        assert_eq!(matrix.retention[[0, 0]], 1.0);
    }
}
