//! Progressive marginal-rate tax.
//!
//! One function serves every jurisdiction; the [`BracketTable`] argument is
//! the only thing that differs between them.

use rust_decimal::Decimal;

use crate::BracketTable;
use crate::calculations::common::{round_half_up, sanitize_amount};

/// Computes the tax owed on `amount` under `table`.
///
/// Each tier taxes only the slice of income between the previous tier's
/// limit and its own; income above the last limit is taxed at the table's
/// top rate. Contributions are accumulated at full precision and the total
/// is rounded to cents once, at the end. Negative amounts are taxed as zero.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use withdrawal_core::BracketTable;
/// use withdrawal_core::calculations::compute_tax;
///
/// let table = BracketTable::us_federal_2025_single();
///
/// assert_eq!(compute_tax(dec!(11925), &table), dec!(1192.50));
/// assert_eq!(compute_tax(dec!(50000), &table), dec!(5914.00));
/// ```
pub fn compute_tax(
    amount: Decimal,
    table: &BracketTable,
) -> Decimal {
    let amount = sanitize_amount(amount);
    let mut tax = Decimal::ZERO;
    let mut previous_limit = Decimal::ZERO;

    for tier in table.tiers() {
        if amount > tier.upper_limit {
            tax += (tier.upper_limit - previous_limit) * tier.rate;
            previous_limit = tier.upper_limit;
        } else {
            tax += (amount - previous_limit) * tier.rate;
            return round_half_up(tax);
        }
    }

    tax += (amount - previous_limit) * table.top_rate();
    round_half_up(tax)
}
