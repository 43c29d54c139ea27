use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{BracketTable, BracketTableError};

/// Errors that can occur when assembling a [`WithdrawalConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WithdrawalConfigError {
    /// The early-withdrawal penalty rate must be between 0 and 1.
    #[error("penalty rate must be between 0 and 1, got {0}")]
    InvalidPenaltyRate(Decimal),

    /// The conversion rate must be positive.
    #[error("conversion rate must be positive, got {0}")]
    InvalidConversionRate(Decimal),

    #[error("source bracket table: {0}")]
    SourceTable(BracketTableError),

    #[error("resident bracket table: {0}")]
    ResidentTable(BracketTableError),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWithdrawalConfig {
    source: Option<BracketTable>,
    resident: Option<BracketTable>,
    penalty_rate: Option<Decimal>,
    conversion_rate: Option<Decimal>,
}

/// Immutable rates and tables shared by every computation.
///
/// Loaded once at start-up and passed around by reference. Any field left
/// out of a deserialized document falls back to [`WithdrawalConfig::default`].
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use withdrawal_core::WithdrawalConfig;
///
/// let config = WithdrawalConfig::default();
///
/// assert_eq!(config.penalty_rate(), dec!(0.10));
/// assert_eq!(config.conversion_rate(), dec!(87));
/// assert_eq!(config.source().top_rate(), dec!(0.37));
/// assert_eq!(config.resident().top_rate(), dec!(0.30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWithdrawalConfig")]
pub struct WithdrawalConfig {
    source: BracketTable,
    resident: BracketTable,
    penalty_rate: Decimal,
    conversion_rate: Decimal,
}

impl Default for WithdrawalConfig {
    fn default() -> Self {
        Self {
            source: BracketTable::us_federal_2025_single(),
            resident: BracketTable::india_new_regime_2025(),
            penalty_rate: Decimal::new(10, 2),
            conversion_rate: Decimal::from(87),
        }
    }
}

impl TryFrom<RawWithdrawalConfig> for WithdrawalConfig {
    type Error = WithdrawalConfigError;

    fn try_from(raw: RawWithdrawalConfig) -> Result<Self, Self::Error> {
        let defaults = Self::default();
        Self::new(
            raw.source.unwrap_or(defaults.source),
            raw.resident.unwrap_or(defaults.resident),
            raw.penalty_rate.unwrap_or(defaults.penalty_rate),
            raw.conversion_rate.unwrap_or(defaults.conversion_rate),
        )
    }
}

impl WithdrawalConfig {
    /// Builds a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WithdrawalConfigError`] if:
    /// - `penalty_rate` is not in [0, 1]
    /// - `conversion_rate` is not positive
    /// - either bracket table breaks its invariants
    pub fn new(
        source: BracketTable,
        resident: BracketTable,
        penalty_rate: Decimal,
        conversion_rate: Decimal,
    ) -> Result<Self, WithdrawalConfigError> {
        let config = Self {
            source,
            resident,
            penalty_rate,
            conversion_rate,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates every rate and both tables.
    pub fn validate(&self) -> Result<(), WithdrawalConfigError> {
        if self.penalty_rate < Decimal::ZERO || self.penalty_rate > Decimal::ONE {
            return Err(WithdrawalConfigError::InvalidPenaltyRate(
                self.penalty_rate,
            ));
        }

        if self.conversion_rate <= Decimal::ZERO {
            return Err(WithdrawalConfigError::InvalidConversionRate(
                self.conversion_rate,
            ));
        }

        self.source
            .validate()
            .map_err(WithdrawalConfigError::SourceTable)?;
        self.resident
            .validate()
            .map_err(WithdrawalConfigError::ResidentTable)?;

        Ok(())
    }

    /// Table for the jurisdiction where the fund is held.
    pub fn source(&self) -> &BracketTable {
        &self.source
    }

    /// Table for the withdrawer's country of residence.
    pub fn resident(&self) -> &BracketTable {
        &self.resident
    }

    pub fn penalty_rate(&self) -> Decimal {
        self.penalty_rate
    }

    /// Units of resident currency per unit of source currency.
    pub fn conversion_rate(&self) -> Decimal {
        self.conversion_rate
    }

    /// Returns a copy with both bracket tables replaced.
    pub fn with_tables(
        self,
        source: BracketTable,
        resident: BracketTable,
    ) -> Result<Self, WithdrawalConfigError> {
        Self::new(source, resident, self.penalty_rate, self.conversion_rate)
    }
}
