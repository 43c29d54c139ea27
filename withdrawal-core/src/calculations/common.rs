//! Common utility functions for withdrawal calculations.
//!
//! This module provides the rounding and input clamping shared by every
//! calculator. Invalid amounts never produce an error; they degrade to zero.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::warn;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use withdrawal_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use withdrawal_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps an amount to be non-negative.
pub fn sanitize_amount(amount: Decimal) -> Decimal {
    if amount < Decimal::ZERO {
        warn!(%amount, "negative amount clamped to zero");
        return Decimal::ZERO;
    }
    amount
}

/// Converts a floating-point amount, mapping NaN, infinities, negatives and
/// values outside the decimal range to zero.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use withdrawal_core::calculations::common::sanitize_amount_f64;
///
/// assert_eq!(sanitize_amount_f64(1250.5), dec!(1250.5));
/// assert_eq!(sanitize_amount_f64(f64::NAN), Decimal::ZERO);
/// assert_eq!(sanitize_amount_f64(-3.0), Decimal::ZERO);
/// ```
pub fn sanitize_amount_f64(amount: f64) -> Decimal {
    if !amount.is_finite() {
        warn!(amount, "non-finite amount clamped to zero");
        return Decimal::ZERO;
    }

    match Decimal::from_f64(amount) {
        Some(value) => sanitize_amount(value),
        None => {
            warn!(amount, "amount outside decimal range clamped to zero");
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        let result = round_half_up(dec!(123.454));

        assert_eq!(result, dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(123.455));

        assert_eq!(result, dec!(123.46));
    }

    #[test]
    fn round_half_up_preserves_already_rounded_values() {
        let result = round_half_up(dec!(1192.50));

        assert_eq!(result, dec!(1192.50));
    }

    #[test]
    fn round_half_up_handles_long_fractions() {
        // 995000 / 87
        let result = round_half_up(dec!(11436.7816091954));

        assert_eq!(result, dec!(11436.78));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
        assert_eq!(max(dec!(200.00), dec!(100.00)), dec!(200.00));
    }

    #[test]
    fn max_handles_zero_floor() {
        assert_eq!(max(dec!(-0.01), Decimal::ZERO), Decimal::ZERO);
    }

    // =========================================================================
    // sanitize tests
    // =========================================================================

    #[test]
    fn sanitize_amount_keeps_non_negative_values() {
        assert_eq!(sanitize_amount(dec!(0)), dec!(0));
        assert_eq!(sanitize_amount(dec!(50000.25)), dec!(50000.25));
    }

    #[test]
    fn sanitize_amount_clamps_negative_values() {
        assert_eq!(sanitize_amount(dec!(-0.01)), Decimal::ZERO);
        assert_eq!(sanitize_amount(dec!(-50000)), Decimal::ZERO);
    }

    #[test]
    fn sanitize_amount_f64_clamps_non_finite_values() {
        assert_eq!(sanitize_amount_f64(f64::NAN), Decimal::ZERO);
        assert_eq!(sanitize_amount_f64(f64::INFINITY), Decimal::ZERO);
        assert_eq!(sanitize_amount_f64(f64::NEG_INFINITY), Decimal::ZERO);
    }

    #[test]
    fn sanitize_amount_f64_clamps_out_of_range_values() {
        assert_eq!(sanitize_amount_f64(1e40), Decimal::ZERO);
    }

    #[test]
    fn sanitize_amount_f64_converts_whole_amounts_exactly() {
        assert_eq!(sanitize_amount_f64(50000.0), dec!(50000));
        assert_eq!(sanitize_amount_f64(-1.0), Decimal::ZERO);
    }
}
