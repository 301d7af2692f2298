//! Shared derived metrics for the four analyses
//!
//! Every analysis is a pure function from the cleaned record slice (plus
//! fixed lookup tables and reference dates) to a small derived table, so
//! nothing one analysis computes is visible to another.

pub mod cohort;
pub mod delinquency;
pub mod retention;
pub mod revenue;

use chrono::{Datelike, NaiveDateTime};
use std::fmt;

use crate::data::Customer;

/// A calendar month, the granularity cohorts and activity are tracked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn of(timestamp: NaiveDateTime) -> Self {
        Month {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }

    fn succ(self) -> Self {
        if self.month == 12 {
            Month {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Month {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Lazy iterator over `start..=end`; empty when `end` precedes `start`.
    pub fn range_inclusive(start: Month, end: Month) -> Months {
        Months {
            next: Some(start).filter(|s| *s <= end),
            end,
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Finite, restartable month sequence. Cloning restarts iteration from
/// the current position, so the fan-out never needs a materialized list.
#[derive(Debug, Clone)]
pub struct Months {
    next: Option<Month>,
    end: Month,
}

impl Iterator for Months {
    type Item = Month;

    fn next(&mut self) -> Option<Month> {
        let current = self.next?;
        self.next = if current < self.end {
            Some(current.succ())
        } else {
            None
        };
        Some(current)
    }
}

/// End of a customer's subscription: the cancellation date, or the
/// reference date while they remain open-ended.
pub fn end_date(customer: &Customer, as_of: NaiveDateTime) -> NaiveDateTime {
    customer.cancellation_date.unwrap_or(as_of)
}

/// Whole months between two timestamps: days divided by 30, truncated
/// toward zero.
pub fn duration_months(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_days() / 30
}

/// The months a customer was active, from their conversion month through
/// the month of `min(end_date, cutoff)` inclusive. `None` for customers
/// who never converted; an empty sequence when the cutoff precedes the
/// conversion month.
pub fn active_months(
    customer: &Customer,
    as_of: NaiveDateTime,
    cutoff: NaiveDateTime,
) -> Option<Months> {
    let conversion = customer.conversion_date?;
    let bound = end_date(customer, as_of).min(cutoff);
    Some(Month::range_inclusive(Month::of(conversion), Month::of(bound)))
}
