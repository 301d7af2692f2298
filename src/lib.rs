//! ChurnLens: exploratory retention and revenue analysis for subscription
//! customer exports
//!
//! This library cleans a raw customer CSV export and computes four
//! descriptive analyses: retention by geography, revenue expansion,
//! cohort retention trending, and delinquency impact.

pub mod analysis;
pub mod cli;
pub mod data;
pub mod geo;
pub mod viz;

// Re-export public items for easier access
pub use analysis::{cohort, delinquency, retention, revenue, Month};
pub use cli::Args;
pub use data::{load_customers, Customer};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
