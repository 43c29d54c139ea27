use rust_decimal::Decimal;

use crate::calculations::common::{round_half_up, sanitize_amount};

/// Computes the flat early-withdrawal penalty.
///
/// Returns zero when the withdrawal is not early or the amount is zero or
/// negative; otherwise `amount * penalty_rate` rounded to cents.
pub fn compute_penalty(
    amount: Decimal,
    is_early: bool,
    penalty_rate: Decimal,
) -> Decimal {
    let amount = sanitize_amount(amount);
    if !is_early || amount.is_zero() {
        return Decimal::ZERO;
    }
    round_half_up(amount * penalty_rate)
}
