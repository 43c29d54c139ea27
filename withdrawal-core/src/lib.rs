pub mod calculations;
pub mod models;

pub use calculations::{WithdrawalCalculator, WithdrawalReport, WithdrawalRequest};
pub use models::*;
