use crate::core::error::SplitError;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Tolerance used for every comparison against zero: one cent.
pub const EPSILON: Decimal = dec!(0.01);

/// Minor-unit precision of the currencies in scope.
pub const MINOR_UNITS: u32 = 2;

/// Largest scale a `Decimal` can represent.
const MAX_MINOR_UNITS: u32 = 28;

/// Numeric settings shared by the balance calculator and the settlement
/// minimizer.
///
/// # Examples
///
/// ```
/// use split_engine::core::money::SplitConfig;
/// use rust_decimal_macros::dec;
///
/// let config = SplitConfig::default();
/// assert_eq!(config.epsilon, dec!(0.01));
/// assert_eq!(config.round(dec!(33.335)), dec!(33.34));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Amounts whose magnitude is at or below this are treated as zero.
    pub epsilon: Decimal,
    /// Decimal places reported settlement amounts are rounded to.
    pub minor_units: u32,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            minor_units: MINOR_UNITS,
        }
    }
}

impl SplitConfig {
    pub fn validate(&self) -> Result<(), SplitError> {
        if self.epsilon <= Decimal::ZERO {
            return Err(SplitError::InvalidConfig {
                reason: format!("epsilon must be positive, got {}", self.epsilon),
            });
        }
        if self.minor_units > MAX_MINOR_UNITS {
            return Err(SplitError::InvalidConfig {
                reason: format!(
                    "minor units must be at most {}, got {}",
                    MAX_MINOR_UNITS, self.minor_units
                ),
            });
        }
        // A smaller epsilon lets sub-unit amounts through that round to zero.
        if self.epsilon < self.unit() {
            return Err(SplitError::InvalidConfig {
                reason: format!(
                    "epsilon {} is smaller than one minor unit ({})",
                    self.epsilon,
                    self.unit()
                ),
            });
        }
        Ok(())
    }

    /// The smallest reportable amount, `10^-minor_units`.
    pub fn unit(&self) -> Decimal {
        Decimal::new(1, self.minor_units.min(MAX_MINOR_UNITS))
    }

    /// True when `amount` is within epsilon of zero.
    pub fn is_negligible(&self, amount: Decimal) -> bool {
        amount.abs() <= self.epsilon
    }

    /// Round to the configured minor-unit precision, midpoint away from zero.
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.minor_units, RoundingStrategy::MidpointAwayFromZero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SplitConfig::default().validate().is_ok());
    }

    #[test]
    fn test_non_positive_epsilon_rejected() {
        let config = SplitConfig {
            epsilon: Decimal::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SplitError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_epsilon_below_minor_unit_rejected() {
        let config = SplitConfig {
            epsilon: dec!(0.001),
            minor_units: 2,
        };
        assert!(matches!(
            config.validate(),
            Err(SplitError::InvalidConfig { .. })
        ));

        let whole_units = SplitConfig {
            epsilon: dec!(1),
            minor_units: 0,
        };
        assert!(whole_units.validate().is_ok());
        assert_eq!(whole_units.unit(), dec!(1));
    }

    #[test]
    fn test_too_many_minor_units_rejected() {
        let config = SplitConfig {
            epsilon: dec!(0.01),
            minor_units: 29,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rounding_to_cents() {
        let config = SplitConfig::default();
        assert_eq!(config.round(dec!(33.333333)), dec!(33.33));
        assert_eq!(config.round(dec!(66.666667)), dec!(66.67));
        assert_eq!(config.round(dec!(0.005)), dec!(0.01));
        assert_eq!(config.round(dec!(-0.005)), dec!(-0.01));
    }

    #[test]
    fn test_negligible_is_inclusive() {
        let config = SplitConfig::default();
        assert!(config.is_negligible(dec!(0.01)));
        assert!(config.is_negligible(dec!(-0.004)));
        assert!(!config.is_negligible(dec!(0.011)));
    }
}
