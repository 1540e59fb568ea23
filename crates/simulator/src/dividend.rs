use crate::error::SimulationError;
use crate::{INITIAL_EQUITY, Simulator, validate_prices};

impl Simulator {
    /// Computes the equity path of an unleveraged position with dividends reinvested.
    ///
    /// `dividends` is aligned with `prices`. The dividend at offset 0 is ignored because no
    /// holding period has elapsed at the window start:
    ///
    /// ```text
    /// V[i+1] = V[i] * (1 + (P[i+1] - P[i] + D[i+1]) / P[i])
    /// ```
    pub fn dividend_adjusted(
        &self,
        prices: &[f64],
        dividends: &[f64],
    ) -> Result<Vec<f64>, SimulationError> {
        validate_prices(prices)?;
        if dividends.len() != prices.len() {
            return Err(SimulationError::LengthMismatch {
                prices: prices.len(),
                dividends: dividends.len(),
            });
        }
        if let Some((index, &value)) = dividends
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, d)| !d.is_finite())
        {
            return Err(SimulationError::InvalidDividend { index, value });
        }

        let mut path = Vec::with_capacity(prices.len());
        path.push(INITIAL_EQUITY);

        for i in 0..prices.len() - 1 {
            let cash = prices[i + 1] - prices[i] + dividends[i + 1];
            let next = path[i] * (1.0 + cash / prices[i]);
            if !next.is_finite() {
                return Err(SimulationError::NonFiniteEquity(i + 1));
            }
            path.push(next);
        }

        Ok(path)
    }
}
