use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Deductions and net proceeds for one withdrawal under one regime.
///
/// Every figure is in the source currency and rounded to cents.
/// `total_deducted` is the sum of the three rounded components and
/// `receivable` is the principal less `total_deducted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxResult {
    /// Tax withheld by the jurisdiction holding the fund.
    pub source_tax: Decimal,

    /// Net tax owed to the country of residence after the source-tax credit.
    pub resident_tax: Decimal,

    /// Early-withdrawal penalty.
    pub penalty: Decimal,

    pub total_deducted: Decimal,

    pub receivable: Decimal,
}
