mod bracket_table;
mod plan_type;
mod regime;
mod tax_result;
mod withdrawal_config;

pub use bracket_table::{BracketTable, BracketTableError, BracketTier};
pub use plan_type::PlanType;
pub use regime::{Regime, Residency};
pub use tax_result::TaxResult;
pub use withdrawal_config::{WithdrawalConfig, WithdrawalConfigError};
