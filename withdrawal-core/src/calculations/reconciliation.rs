//! Double-taxation credit between the source and resident jurisdictions.
//!
//! The resident country taxes the full principal in its own currency, then
//! credits the tax already paid at source. Only the excess is payable, and
//! the comparison happens in the source currency.

use rust_decimal::Decimal;
use tracing::debug;

use crate::BracketTable;
use crate::calculations::common::{max, round_half_up, sanitize_amount};
use crate::calculations::currency::{to_primary, to_secondary};
use crate::calculations::progressive::compute_tax;

/// Resident-country liability for one principal, before and after the credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidentLiability {
    /// Full resident tax in resident currency.
    pub gross_local: Decimal,

    /// Full resident tax converted to source currency, rounded to cents.
    pub gross: Decimal,

    /// Amount still payable after crediting source tax; never negative.
    pub net: Decimal,
}

/// Computes the resident liability in detail.
///
/// See [`reconcile_resident_tax`] for the figure most callers need.
pub fn resident_liability(
    source_tax: Decimal,
    principal: Decimal,
    resident_table: &BracketTable,
    rate: Decimal,
) -> ResidentLiability {
    let principal = sanitize_amount(principal);
    let source_tax = sanitize_amount(source_tax);

    let principal_local = to_secondary(principal, rate);
    let gross_local = compute_tax(principal_local, resident_table);
    let gross = round_half_up(to_primary(gross_local, rate));
    let net = max(gross - source_tax, Decimal::ZERO);

    debug!(%principal_local, %gross_local, %gross, %source_tax, %net, "reconciled resident tax");

    ResidentLiability {
        gross_local,
        gross,
        net,
    }
}

/// Returns the resident tax still payable, in source currency, after
/// crediting `source_tax`.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use withdrawal_core::BracketTable;
/// use withdrawal_core::calculations::reconcile_resident_tax;
///
/// let india = BracketTable::india_new_regime_2025();
///
/// // ₹995,000 of Indian tax is $11,436.78; $5,914 was already paid in the US.
/// let net = reconcile_resident_tax(dec!(5914.00), dec!(50000), &india, dec!(87));
/// assert_eq!(net, dec!(5522.78));
/// ```
pub fn reconcile_resident_tax(
    source_tax: Decimal,
    principal: Decimal,
    resident_table: &BracketTable,
    rate: Decimal,
) -> Decimal {
    resident_liability(source_tax, principal, resident_table, rate).net
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::BracketTier;

    fn india_table() -> BracketTable {
        BracketTable::india_new_regime_2025()
    }

    #[test]
    fn resident_tax_above_source_tax_is_payable_in_excess() {
        let net = reconcile_resident_tax(dec!(5914.00), dec!(50000), &india_table(), dec!(87));

        assert_eq!(net, dec!(5522.78));
    }

    #[test]
    fn resident_tax_below_source_tax_is_fully_credited() {
        // ₹870,000 → ₹37,000 → $425.29, against $1,000 of source tax
        let liability = resident_liability(dec!(1000.00), dec!(10000), &india_table(), dec!(87));

        assert_eq!(liability.gross_local, dec!(37000.00));
        assert_eq!(liability.gross, dec!(425.29));
        assert_eq!(liability.net, dec!(0));
    }

    #[test]
    fn equal_liabilities_leave_nothing_payable() {
        let table = BracketTable::new(vec![BracketTier::new(dec!(1000), dec!(0.10))], dec!(0.10))
            .unwrap();

        let net = reconcile_resident_tax(dec!(100.00), dec!(1000), &table, dec!(1));

        assert_eq!(net, dec!(0));
    }

    #[test]
    fn zero_principal_owes_nothing() {
        let net = reconcile_resident_tax(dec!(0), dec!(0), &india_table(), dec!(87));

        assert_eq!(net, dec!(0));
    }

    #[test]
    fn negative_inputs_are_clamped() {
        let net = reconcile_resident_tax(dec!(-10), dec!(-50000), &india_table(), dec!(87));

        assert_eq!(net, dec!(0));
    }

    #[test]
    fn gross_is_rounded_after_converting_back() {
        let liability = resident_liability(dec!(0), dec!(50000), &india_table(), dec!(87));

        assert_eq!(liability.gross_local, dec!(995000.00));
        assert_eq!(liability.gross, dec!(11436.78));
        assert_eq!(liability.net, dec!(11436.78));
    }

    proptest! {
        #[test]
        fn prop_net_is_never_negative(principal in 0i64..100_000_000, source_tax in 0i64..100_000_000) {
            let net = reconcile_resident_tax(
                Decimal::new(source_tax, 2),
                Decimal::new(principal, 2),
                &india_table(),
                dec!(87),
            );

            prop_assert!(net >= Decimal::ZERO);
        }

        #[test]
        fn prop_net_is_zero_when_source_tax_covers_resident_tax(principal in 0i64..100_000_000, extra in 0i64..1_000_000) {
            let principal = Decimal::new(principal, 2);
            let gross = resident_liability(Decimal::ZERO, principal, &india_table(), dec!(87)).gross;
            let source_tax = gross + Decimal::new(extra, 2);

            prop_assert_eq!(reconcile_resident_tax(source_tax, principal, &india_table(), dec!(87)), Decimal::ZERO);
        }
    }
}
