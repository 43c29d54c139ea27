use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a bracket table violates its ordering or rate invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    /// A table needs at least one tier below its top rate.
    #[error("bracket table has no tiers")]
    NoTiers,

    /// Tier upper limits must be non-negative.
    #[error("tier {index} has a negative upper limit {limit}")]
    NegativeLimit { index: usize, limit: Decimal },

    /// Tier upper limits must be strictly increasing.
    #[error("tier {index} upper limit {limit} does not exceed previous limit {previous}")]
    NonIncreasingLimit {
        index: usize,
        limit: Decimal,
        previous: Decimal,
    },

    /// Marginal rates must lie in [0, 1).
    #[error("tier {index} rate must be in [0, 1), got {rate}")]
    InvalidTierRate { index: usize, rate: Decimal },

    /// The catch-all top rate must lie in [0, 1).
    #[error("top rate must be in [0, 1), got {0}")]
    InvalidTopRate(Decimal),
}

/// One marginal-rate segment of a progressive table.
///
/// The tier's base is the previous tier's `upper_limit` (0 for the first tier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTier {
    pub upper_limit: Decimal,
    pub rate: Decimal,
}

impl BracketTier {
    pub fn new(
        upper_limit: Decimal,
        rate: Decimal,
    ) -> Self {
        Self { upper_limit, rate }
    }
}

#[derive(Debug, Deserialize)]
struct RawBracketTable {
    tiers: Vec<BracketTier>,
    top_rate: Decimal,
}

/// An ordered marginal-rate table for a single jurisdiction.
///
/// Tiers are sorted ascending by upper limit with no gaps; income above the
/// last limit is taxed at `top_rate`. Tables are only obtainable through
/// [`BracketTable::new`] or deserialization, both of which validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBracketTable")]
pub struct BracketTable {
    tiers: Vec<BracketTier>,
    top_rate: Decimal,
}

impl TryFrom<RawBracketTable> for BracketTable {
    type Error = BracketTableError;

    fn try_from(raw: RawBracketTable) -> Result<Self, Self::Error> {
        Self::new(raw.tiers, raw.top_rate)
    }
}

impl BracketTable {
    /// Builds a validated table.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] if the tier list is empty, a limit is
    /// negative or not strictly greater than its predecessor, or any rate
    /// falls outside `[0, 1)`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use withdrawal_core::{BracketTable, BracketTier};
    ///
    /// let table = BracketTable::new(
    ///     vec![
    ///         BracketTier::new(dec!(10000), dec!(0.10)),
    ///         BracketTier::new(dec!(40000), dec!(0.20)),
    ///     ],
    ///     dec!(0.30),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(table.tiers().len(), 2);
    /// assert_eq!(table.top_rate(), dec!(0.30));
    /// ```
    pub fn new(
        tiers: Vec<BracketTier>,
        top_rate: Decimal,
    ) -> Result<Self, BracketTableError> {
        let table = Self { tiers, top_rate };
        table.validate()?;
        Ok(table)
    }

    /// Construction for compiled-in tables whose invariants are covered by tests.
    pub(crate) fn from_static(
        tiers: &[(i64, i64)],
        top_rate_percent: i64,
    ) -> Self {
        Self {
            tiers: tiers
                .iter()
                .map(|&(limit, percent)| {
                    BracketTier::new(Decimal::from(limit), Decimal::new(percent, 2))
                })
                .collect(),
            top_rate: Decimal::new(top_rate_percent, 2),
        }
    }

    /// Checks the ordering and rate invariants.
    pub fn validate(&self) -> Result<(), BracketTableError> {
        if self.tiers.is_empty() {
            return Err(BracketTableError::NoTiers);
        }

        let mut previous: Option<Decimal> = None;
        for (index, tier) in self.tiers.iter().enumerate() {
            if tier.upper_limit < Decimal::ZERO {
                return Err(BracketTableError::NegativeLimit {
                    index,
                    limit: tier.upper_limit,
                });
            }
            if let Some(previous) = previous {
                if tier.upper_limit <= previous {
                    return Err(BracketTableError::NonIncreasingLimit {
                        index,
                        limit: tier.upper_limit,
                        previous,
                    });
                }
            }
            if !is_marginal_rate(tier.rate) {
                return Err(BracketTableError::InvalidTierRate {
                    index,
                    rate: tier.rate,
                });
            }
            previous = Some(tier.upper_limit);
        }

        if !is_marginal_rate(self.top_rate) {
            return Err(BracketTableError::InvalidTopRate(self.top_rate));
        }

        Ok(())
    }

    pub fn tiers(&self) -> &[BracketTier] {
        &self.tiers
    }

    pub fn top_rate(&self) -> Decimal {
        self.top_rate
    }

    /// Upper limit of the last tier; income above it falls in the top rate.
    pub fn top_threshold(&self) -> Decimal {
        self.tiers
            .last()
            .map(|tier| tier.upper_limit)
            .unwrap_or(Decimal::ZERO)
    }

    /// 2025 US federal brackets for a single filer, 37% above $626,350.
    pub fn us_federal_2025_single() -> Self {
        Self::from_static(
            &[
                (11_925, 10),
                (48_475, 12),
                (103_350, 22),
                (197_300, 24),
                (250_525, 32),
                (626_350, 35),
            ],
            37,
        )
    }

    /// 2025 Indian new-regime slabs, 30% above ₹15,00,000.
    pub fn india_new_regime_2025() -> Self {
        Self::from_static(
            &[
                (300_000, 0),
                (700_000, 5),
                (1_000_000, 10),
                (1_200_000, 15),
                (1_500_000, 20),
            ],
            30,
        )
    }
}

fn is_marginal_rate(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate < Decimal::ONE
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // validation tests
    // =========================================================================

    #[test]
    fn new_accepts_strictly_increasing_limits() {
        let table = BracketTable::new(
            vec![
                BracketTier::new(dec!(100), dec!(0.10)),
                BracketTier::new(dec!(200), dec!(0.20)),
            ],
            dec!(0.30),
        );

        assert!(table.is_ok());
    }

    #[test]
    fn new_rejects_empty_tiers() {
        let result = BracketTable::new(vec![], dec!(0.30));

        assert_eq!(result, Err(BracketTableError::NoTiers));
    }

    #[test]
    fn new_rejects_negative_limit() {
        let result = BracketTable::new(vec![BracketTier::new(dec!(-1), dec!(0.10))], dec!(0.30));

        assert_eq!(
            result,
            Err(BracketTableError::NegativeLimit {
                index: 0,
                limit: dec!(-1),
            })
        );
    }

    #[test]
    fn new_rejects_repeated_limit() {
        let result = BracketTable::new(
            vec![
                BracketTier::new(dec!(100), dec!(0.10)),
                BracketTier::new(dec!(100), dec!(0.20)),
            ],
            dec!(0.30),
        );

        assert_eq!(
            result,
            Err(BracketTableError::NonIncreasingLimit {
                index: 1,
                limit: dec!(100),
                previous: dec!(100),
            })
        );
    }

    #[test]
    fn new_rejects_unsorted_limits() {
        let result = BracketTable::new(
            vec![
                BracketTier::new(dec!(200), dec!(0.10)),
                BracketTier::new(dec!(100), dec!(0.20)),
            ],
            dec!(0.30),
        );

        assert!(matches!(
            result,
            Err(BracketTableError::NonIncreasingLimit { index: 1, .. })
        ));
    }

    #[test]
    fn new_rejects_rate_of_one() {
        let result = BracketTable::new(vec![BracketTier::new(dec!(100), dec!(1))], dec!(0.30));

        assert_eq!(
            result,
            Err(BracketTableError::InvalidTierRate {
                index: 0,
                rate: dec!(1),
            })
        );
    }

    #[test]
    fn new_rejects_negative_top_rate() {
        let result =
            BracketTable::new(vec![BracketTier::new(dec!(100), dec!(0.10))], dec!(-0.01));

        assert_eq!(result, Err(BracketTableError::InvalidTopRate(dec!(-0.01))));
    }

    #[test]
    fn zero_rate_tier_is_allowed() {
        let result = BracketTable::new(vec![BracketTier::new(dec!(100), dec!(0))], dec!(0.05));

        assert!(result.is_ok());
    }

    // =========================================================================
    // built-in table tests
    // =========================================================================

    #[test]
    fn us_federal_table_is_valid() {
        let table = BracketTable::us_federal_2025_single();

        assert_eq!(table.validate(), Ok(()));
        assert_eq!(table.tiers().len(), 6);
        assert_eq!(table.tiers()[0], BracketTier::new(dec!(11925), dec!(0.10)));
        assert_eq!(table.top_threshold(), dec!(626350));
        assert_eq!(table.top_rate(), dec!(0.37));
    }

    #[test]
    fn india_table_is_valid() {
        let table = BracketTable::india_new_regime_2025();

        assert_eq!(table.validate(), Ok(()));
        assert_eq!(table.tiers().len(), 5);
        assert_eq!(table.tiers()[0].rate, dec!(0));
        assert_eq!(table.tiers()[4], BracketTier::new(dec!(1500000), dec!(0.20)));
        assert_eq!(table.top_rate(), dec!(0.30));
    }
}
