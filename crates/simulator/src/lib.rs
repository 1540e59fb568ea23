//! # Window Simulator
//!
//! Reconstructs the equity path of a synthetic position over a slice of prices.
//!
//! - `Simulator::leveraged` runs the daily-rebalanced leverage recurrence.
//! - `Simulator::dividend_adjusted` runs the unleveraged, dividend-reinvested recurrence.
//! - `detect_bust` classifies a path as solvent or insolvent.
//!
//! Every path starts from the same normalized capital, `INITIAL_EQUITY`, so results from
//! different windows and leverages are directly comparable.

pub mod bust;
pub mod dividend;
pub mod error;
pub mod leverage;

pub use bust::detect_bust;
pub use error::SimulationError;

/// Starting capital of every simulated path.
pub const INITIAL_EQUITY: f64 = 1.0;

/// A stateless calculator for equity paths.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Simulator;

impl Simulator {
    pub fn new() -> Self {
        Self
    }
}

/// Rejects paths that are too short or contain a price the recurrences cannot divide by.
pub fn validate_prices(prices: &[f64]) -> Result<(), SimulationError> {
    if prices.len() < 2 {
        return Err(SimulationError::EmptyPath(prices.len()));
    }
    if let Some((index, &price)) = prices
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p <= 0.0)
    {
        return Err(SimulationError::NonPositivePrice { index, price });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_path_starts_at_initial_equity() {
        let sim = Simulator::new();
        let leveraged = sim.leveraged(&[100.0, 50.0], 3.0).unwrap();
        let dividend = sim.dividend_adjusted(&[100.0, 50.0], &[7.0, 1.0]).unwrap();

        assert_eq!(leveraged[0], INITIAL_EQUITY);
        assert_eq!(dividend[0], INITIAL_EQUITY);
    }

    #[test]
    fn validates_price_paths() {
        assert_eq!(validate_prices(&[1.0]), Err(SimulationError::EmptyPath(1)));
        assert_eq!(
            validate_prices(&[1.0, 0.0, 2.0]),
            Err(SimulationError::NonPositivePrice {
                index: 1,
                price: 0.0
            })
        );
        assert!(validate_prices(&[1.0, 2.0]).is_ok());
    }
}
