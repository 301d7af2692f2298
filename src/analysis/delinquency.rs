//! Delinquency impact: average duration, total charges, and MRR split by
//! the delinquency flag

use chrono::NaiveDateTime;

use super::{duration_months, end_date};
use crate::data::Customer;

/// Per-group means for one delinquency state.
#[derive(Debug, Clone, PartialEq)]
pub struct DelinquencyRow {
    pub is_delinquent: bool,
    pub customers: usize,
    pub avg_duration: f64,
    pub avg_total_charges: f64,
    pub avg_current_mrr: f64,
}

/// Split converted customers by the delinquency flag and average duration,
/// total charges, and current MRR per group. The non-delinquent row comes
/// first; a group with no members is omitted. Money means skip values that
/// failed coercion; a group with no usable values averages to 0.
pub fn analyze(customers: &[Customer], as_of: NaiveDateTime) -> Vec<DelinquencyRow> {
    [false, true]
        .into_iter()
        .filter_map(|flag| summarize(customers, flag, as_of))
        .collect()
}

fn summarize(customers: &[Customer], flag: bool, as_of: NaiveDateTime) -> Option<DelinquencyRow> {
    let mut count = 0usize;
    let mut duration_sum = 0.0;
    let mut charges = MeanAcc::default();
    let mut mrr = MeanAcc::default();

    for customer in customers {
        if customer.is_delinquent != flag {
            continue;
        }
        let conversion = match customer.conversion_date {
            Some(conversion) => conversion,
            None => continue,
        };
        count += 1;
        duration_sum += duration_months(conversion, end_date(customer, as_of)) as f64;
        charges.add(customer.total_charges);
        mrr.add(customer.current_mrr);
    }

    if count == 0 {
        return None;
    }
    Some(DelinquencyRow {
        is_delinquent: flag,
        customers: count,
        avg_duration: duration_sum / count as f64,
        avg_total_charges: charges.mean(),
        avg_current_mrr: mrr.mean(),
    })
}

/// Mean over present values only.
#[derive(Default)]
struct MeanAcc {
    sum: f64,
    count: usize,
}

impl MeanAcc {
    fn add(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
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

    fn customer(id: &str, delinquent: bool, months_active: i64, charges: f64, mrr: f64) -> Customer {
        let conversion = at(2022, 1, 1);
        Customer {
            id: id.to_string(),
            provider: "stripe".to_string(),
            signup_date: Some(at(2021, 12, 1)),
            conversion_date: Some(conversion),
            cancellation_date: Some(conversion + chrono::Duration::days(months_active * 30)),
            total_charges: Some(charges),
            current_mrr: Some(mrr),
            is_canceled: true,
            is_active: false,
            is_delinquent: delinquent,
            converted: true,
            country: "FRANCE".to_string(),
        }
    }

    #[test]
    fn test_two_row_summary() {
        let customers = vec![
            customer("a", false, 12, 240.0, 20.0),
            customer("b", false, 6, 60.0, 10.0),
            customer("c", true, 2, 30.0, 15.0),
        ];
        let rows = analyze(&customers, at(2024, 1, 1));

        assert_eq!(rows.len(), 2);
        assert!(!rows[0].is_delinquent);
        assert_eq!(rows[0].customers, 2);
        assert_eq!(rows[0].avg_duration, 9.0);
        assert_eq!(rows[0].avg_total_charges, 150.0);
        assert_eq!(rows[0].avg_current_mrr, 15.0);

        assert!(rows[1].is_delinquent);
        assert_eq!(rows[1].avg_duration, 2.0);
    }

    #[test]
    fn test_empty_group_omitted() {
        let rows = analyze(&[customer("a", false, 3, 30.0, 10.0)], at(2024, 1, 1));
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_delinquent);
    }

    #[test]
    fn test_absent_money_skipped_in_means() {
        let mut missing = customer("a", true, 4, 0.0, 0.0);
        missing.total_charges = None;
        missing.current_mrr = None;
        let present = customer("b", true, 4, 80.0, 8.0);

        let rows = analyze(&[missing, present], at(2024, 1, 1));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].customers, 2);
        assert_eq!(rows[0].avg_total_charges, 80.0);
        assert_eq!(rows[0].avg_current_mrr, 8.0);
    }

    #[test]
    fn test_unconverted_customers_excluded() {
        let mut never = customer("a", true, 4, 80.0, 8.0);
        never.conversion_date = None;
        assert!(analyze(&[never], at(2024, 1, 1)).is_empty());
    }
}
