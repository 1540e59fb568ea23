use crate::error::CoreError;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A leverage multiplier paired with its canonical string key.
///
/// The key is derived once, when the run is configured, from the normalized decimal
/// representation of the multiplier: `1.0` becomes `"1"`, `1.50` becomes `"1.5"`.
/// Equality and hashing use the key, so two multipliers that would render to the same
/// column are the same leverage.
#[derive(Debug, Clone, Serialize)]
pub struct LeverageKey {
    value: f64,
    key: String,
}

impl LeverageKey {
    pub fn new(value: f64) -> Result<Self, CoreError> {
        if !value.is_finite() {
            return Err(CoreError::InvalidInput(
                "leverage".to_string(),
                format!("{value} is not a finite number"),
            ));
        }
        let decimal = Decimal::from_f64(value).ok_or_else(|| {
            CoreError::InvalidInput(
                "leverage".to_string(),
                format!("{value} cannot be represented as a decimal"),
            )
        })?;

        Ok(Self {
            value,
            key: decimal.normalize().to_string(),
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for LeverageKey {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for LeverageKey {}

impl Hash for LeverageKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for LeverageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Identifies one value column of the returns and annualized-returns tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ResultColumn {
    /// A daily-rebalanced position at the given leverage.
    Leveraged(LeverageKey),
    /// The raw price return of the underlying, without leverage.
    Underlying,
    /// An unleveraged position with dividends reinvested.
    Dividend,
}

impl ResultColumn {
    /// The column header used in every output table.
    pub fn name(&self) -> String {
        match self {
            ResultColumn::Leveraged(leverage) => format!("portfolio_{}x", leverage.key()),
            ResultColumn::Underlying => "underlying".to_string(),
            ResultColumn::Dividend => "1x_dividend".to_string(),
        }
    }

    pub fn leverage(&self) -> Option<&LeverageKey> {
        match self {
            ResultColumn::Leveraged(leverage) => Some(leverage),
            _ => None,
        }
    }
}

impl fmt::Display for ResultColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_normalized_decimals() {
        assert_eq!(LeverageKey::new(1.0).unwrap().key(), "1");
        assert_eq!(LeverageKey::new(1.5).unwrap().key(), "1.5");
        assert_eq!(LeverageKey::new(-1.0).unwrap().key(), "-1");
        assert_eq!(LeverageKey::new(0.1).unwrap().key(), "0.1");
    }

    #[test]
    fn rejects_non_finite_leverage() {
        assert!(LeverageKey::new(f64::NAN).is_err());
        assert!(LeverageKey::new(f64::INFINITY).is_err());
    }

    #[test]
    fn equal_keys_compare_equal() {
        let a = LeverageKey::new(2.0).unwrap();
        let b = LeverageKey::new(2.000).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn column_names() {
        let lev = LeverageKey::new(1.0).unwrap();
        assert_eq!(ResultColumn::Leveraged(lev).name(), "portfolio_1x");
        assert_eq!(ResultColumn::Underlying.name(), "underlying");
        assert_eq!(ResultColumn::Dividend.name(), "1x_dividend");
    }
}
