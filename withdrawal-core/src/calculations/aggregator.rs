//! Per-regime withdrawal results.
//!
//! [`WithdrawalCalculator`] ties the individual calculators together for one
//! configuration. Every call is a pure single pass: source tax and penalty
//! first, the reconciled resident tax when the regime requires it, then the
//! totals.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use withdrawal_core::{Regime, WithdrawalCalculator, WithdrawalConfig};
//!
//! let config = WithdrawalConfig::default();
//! let calculator = WithdrawalCalculator::new(&config);
//!
//! let result = calculator.compute_result(dec!(50000), true, Regime::NoResidentTax);
//!
//! assert_eq!(result.source_tax, dec!(5914.00));
//! assert_eq!(result.penalty, dec!(5000.00));
//! assert_eq!(result.total_deducted, dec!(10914.00));
//! assert_eq!(result.receivable, dec!(39086.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, warn};

use crate::calculations::common::{round_half_up, sanitize_amount};
use crate::calculations::penalty::compute_penalty;
use crate::calculations::progressive::compute_tax;
use crate::calculations::reconciliation::reconcile_resident_tax;
use crate::{PlanType, Regime, Residency, TaxResult, WithdrawalConfig};

/// A withdrawal to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    /// Amount withdrawn, in source currency.
    pub principal: Decimal,

    /// Whether the withdrawal happens before the qualifying age.
    pub is_early: bool,

    pub plan: PlanType,
}

/// Result for one residency status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidencyResult {
    pub residency: Residency,
    pub regime: Regime,
    pub result: TaxResult,

    /// `result.resident_tax` expressed in resident currency, for display.
    pub resident_tax_local: Decimal,
}

/// Facts about the computation that accompany the figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub conversion_rate: Decimal,
    pub is_roth: bool,
    pub is_early: bool,
}

/// Results for every residency status, in [`Residency::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalReport {
    pub principal: Decimal,
    pub results: Vec<ResidencyResult>,
    pub meta: ReportMeta,
}

impl WithdrawalReport {
    pub fn get(
        &self,
        residency: Residency,
    ) -> Option<&ResidencyResult> {
        self.results.iter().find(|r| r.residency == residency)
    }
}

/// Calculator for withdrawal deductions under a fixed configuration.
#[derive(Debug, Clone, Copy)]
pub struct WithdrawalCalculator<'a> {
    config: &'a WithdrawalConfig,
}

impl<'a> WithdrawalCalculator<'a> {
    pub fn new(config: &'a WithdrawalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a WithdrawalConfig {
        self.config
    }

    /// Computes the five result figures for one regime.
    ///
    /// Each component is rounded on its own before summation, so
    /// `total_deducted` is the exact sum of the reported parts. A sum beyond
    /// the decimal range saturates at [`Decimal::MAX`].
    pub fn compute_result(
        &self,
        principal: Decimal,
        is_early: bool,
        regime: Regime,
    ) -> TaxResult {
        let principal = sanitize_amount(principal);

        let source_tax = compute_tax(principal, self.config.source());
        let penalty = compute_penalty(principal, is_early, self.config.penalty_rate());

        let resident_tax = match regime {
            Regime::NoResidentTax => Decimal::ZERO,
            Regime::CreditedResidentTax => reconcile_resident_tax(
                source_tax,
                principal,
                self.config.resident(),
                self.config.conversion_rate(),
            ),
        };

        let total_deducted = match source_tax
            .checked_add(resident_tax)
            .and_then(|sum| sum.checked_add(penalty))
        {
            Some(total) => round_half_up(total),
            None => {
                warn!(
                    %principal,
                    %source_tax,
                    %penalty,
                    "total deducted saturated at decimal maximum"
                );
                Decimal::MAX
            }
        };
        let receivable = round_half_up(principal - total_deducted);

        debug!(
            %principal,
            is_early,
            ?regime,
            %source_tax,
            %resident_tax,
            %penalty,
            %total_deducted,
            %receivable,
            "computed withdrawal result"
        );

        TaxResult {
            source_tax,
            resident_tax,
            penalty,
            total_deducted,
            receivable,
        }
    }

    /// Computes results for every residency status.
    pub fn compute_report(
        &self,
        request: &WithdrawalRequest,
    ) -> WithdrawalReport {
        let principal = sanitize_amount(request.principal);
        let rate = self.config.conversion_rate();

        let results = Residency::ALL
            .iter()
            .map(|&residency| {
                let _span = debug_span!("residency", code = residency.code()).entered();
                let regime = residency.regime();
                let result = self.compute_result(principal, request.is_early, regime);
                ResidencyResult {
                    residency,
                    regime,
                    result,
                    resident_tax_local: round_half_up(result.resident_tax.saturating_mul(rate)),
                }
            })
            .collect();

        WithdrawalReport {
            principal,
            results,
            meta: ReportMeta {
                conversion_rate: rate,
                is_roth: request.plan.is_roth(),
                is_early: request.is_early,
            },
        }
    }
}

/// Computes one regime's result under `config`.
pub fn compute_result(
    principal: Decimal,
    is_early: bool,
    regime: Regime,
    config: &WithdrawalConfig,
) -> TaxResult {
    WithdrawalCalculator::new(config).compute_result(principal, is_early, regime)
}
