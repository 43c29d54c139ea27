//! Fixed-rate conversion between the source and resident currencies.
//!
//! No rounding is applied here; callers round once they have a figure to
//! report.

use rust_decimal::Decimal;
use tracing::warn;

/// Converts a source-currency amount into the resident currency.
///
/// Saturates at [`Decimal::MAX`] rather than overflowing; any tax computed on
/// a saturated amount is understated.
pub fn to_secondary(
    amount: Decimal,
    rate: Decimal,
) -> Decimal {
    amount.checked_mul(rate).unwrap_or_else(|| {
        warn!(%amount, %rate, "currency conversion saturated at decimal maximum");
        Decimal::MAX
    })
}

/// Converts a resident-currency amount back into the source currency.
///
/// A zero rate yields zero.
pub fn to_primary(
    amount: Decimal,
    rate: Decimal,
) -> Decimal {
    amount.checked_div(rate).unwrap_or_else(|| {
        warn!(%amount, %rate, "currency conversion with zero rate");
        Decimal::ZERO
    })
}
