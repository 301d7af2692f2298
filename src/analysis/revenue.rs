//! Revenue expansion: does a customer's current MRR exceed their lifetime
//! average monthly revenue?

use chrono::NaiveDateTime;

use super::{duration_months, end_date};
use crate::data::Customer;

/// Per-customer comparison of lifetime average revenue against current MRR.
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueRow {
    pub id: String,
    pub average_monthly_revenue: f64,
    pub current_mrr: f64,
    /// Current MRR above the lifetime average implies upward revenue drift.
    pub expanding: bool,
}

#[derive(Debug)]
pub struct RevenueExpansion {
    /// Percentage of customers showing expansion, 0-100.
    pub expansion_rate: f64,
    pub rows: Vec<RevenueRow>,
}

/// Compare each converted customer's lifetime average monthly revenue
/// against their current MRR.
///
/// Customers with zero active months or non-positive MRR are degenerate
/// for a rate comparison and are excluded entirely, as are those whose
/// total charges failed coercion.
pub fn analyze(customers: &[Customer], as_of: NaiveDateTime) -> RevenueExpansion {
    let mut rows = Vec::new();

    for customer in customers {
        let conversion = match customer.conversion_date {
            Some(conversion) => conversion,
            None => continue,
        };
        let active_months = duration_months(conversion, end_date(customer, as_of));
        if active_months <= 0 {
            continue;
        }
        let current_mrr = match customer.current_mrr {
            Some(mrr) if mrr > 0.0 => mrr,
            _ => continue,
        };
        let total_charges = match customer.total_charges {
            Some(charges) => charges,
            None => continue,
        };

        let average_monthly_revenue = total_charges / active_months as f64;
        rows.push(RevenueRow {
            id: customer.id.clone(),
            average_monthly_revenue,
            current_mrr,
            expanding: average_monthly_revenue < current_mrr,
        });
    }

    let expansion_rate = if rows.is_empty() {
        0.0
    } else {
        let expanding = rows.iter().filter(|r| r.expanding).count();
        expanding as f64 / rows.len() as f64 * 100.0
    };

    RevenueExpansion {
        expansion_rate,
        rows,
    }
}
