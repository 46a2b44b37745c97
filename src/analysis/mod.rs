//! Analysis modules.
//!
//! The aggregation engine lives in `aggregator`; the other modules scope
//! the snapshot and derive the secondary dashboard figures.

pub mod aggregator;
pub mod compare;
pub mod filter;
pub mod insights;
pub mod rollup;
pub mod yearly;

pub use aggregator::*;
pub use compare::{compare_periods, Subject};
pub use filter::{DateRange, ReviewFilter};
pub use insights::{guest_issues, submission_stats, yes_no_responses, yes_no_summary};
pub use rollup::{rollup, RollupPeriod};
pub use yearly::{available_years, yearly_report};
