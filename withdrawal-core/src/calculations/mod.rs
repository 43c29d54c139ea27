//! Tax, penalty and reconciliation calculations for retirement withdrawals.
//!
//! The leaf calculators are free functions over plain data; the aggregator
//! composes them into per-regime results and full reports.

pub mod aggregator;
pub mod common;
pub mod currency;
pub mod penalty;
pub mod progressive;
pub mod reconciliation;

pub use aggregator::{
    ReportMeta, ResidencyResult, WithdrawalCalculator, WithdrawalReport, WithdrawalRequest,
    compute_result,
};
pub use currency::{to_primary, to_secondary};
pub use penalty::compute_penalty;
pub use progressive::compute_tax;
pub use reconciliation::{ResidentLiability, reconcile_resident_tax, resident_liability};
