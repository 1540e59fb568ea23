use crate::error::SimulationError;
use crate::{INITIAL_EQUITY, Simulator, validate_prices};

impl Simulator {
    /// Computes the equity path of a position rebalanced to `leverage` times equity at every step.
    ///
    /// `prices` runs from the window start through the window end, so the returned path has the
    /// same length. At each step the position holds `leverage * V[i] / P[i]` units of the
    /// underlying for one period:
    ///
    /// ```text
    /// V[i+1] = V[i] + leverage * V[i] / P[i] * (P[i+1] - P[i])
    /// ```
    ///
    /// Equity may go negative; it is never clamped. Use `detect_bust` to classify the result.
    pub fn leveraged(&self, prices: &[f64], leverage: f64) -> Result<Vec<f64>, SimulationError> {
        if !leverage.is_finite() {
            return Err(SimulationError::InvalidParameter("leverage", leverage));
        }
        validate_prices(prices)?;

        let mut path = Vec::with_capacity(prices.len());
        path.push(INITIAL_EQUITY);

        for (i, step) in prices.windows(2).enumerate() {
            let equity = path[i];
            let quantity = leverage * equity / step[0];
            let next = equity + quantity * (step[1] - step[0]);
            if !next.is_finite() {
                return Err(SimulationError::NonFiniteEquity(i + 1));
            }
            if next <= 0.0 && equity > 0.0 {
                tracing::trace!(step = i + 1, leverage, equity = next, "Position went bust");
            }
            path.push(next);
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const EPS: f64 = 1e-12;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < EPS, "{actual:?} != {expected:?}");
        }
    }

    #[test_case(0.5)]
    #[test_case(1.0)]
    #[test_case(2.0)]
    #[test_case(3.0)]
    #[test_case(-1.0)]
    #[test_case(0.0)]
    fn single_step_scales_linearly_with_leverage(leverage: f64) {
        let path = Simulator::new().leveraged(&[100.0, 110.0], leverage).unwrap();
        let total_return = path[1] / path[0] - 1.0;
        assert!((total_return - leverage * 0.10).abs() < EPS);
    }

    #[test]
    fn unleveraged_path_tracks_price() {
        let prices = [100.0, 104.0, 97.76, 86.0288];
        let path = Simulator::new().leveraged(&prices, 1.0).unwrap();
        let expected: Vec<f64> = prices.iter().map(|p| p / prices[0]).collect();
        assert_close(&path, &expected);
    }

    #[test]
    fn matches_scenario_one_two_one() {
        let path = Simulator::new().leveraged(&[1.0, 2.0, 1.0], 1.0).unwrap();
        assert_close(&path, &[1.0, 2.0, 1.0]);
    }

    #[test]
    fn equity_is_not_clamped_below_zero() {
        let path = Simulator::new().leveraged(&[100.0, 90.0, 95.0], 10.0).unwrap();
        assert_close(&path[..2], &[1.0, 0.0]);
        // Zero equity takes a zero position and stays at zero.
        assert_eq!(path[2], 0.0);

        let path = Simulator::new().leveraged(&[100.0, 85.0], 10.0).unwrap();
        assert!((path[1] - (-0.5)).abs() < EPS);
    }

    #[test]
    fn zero_price_is_an_error() {
        let err = Simulator::new().leveraged(&[100.0, 0.0, 50.0], 1.0).unwrap_err();
        assert_eq!(
            err,
            SimulationError::NonPositivePrice {
                index: 1,
                price: 0.0
            }
        );
    }

    #[test]
    fn non_finite_leverage_is_an_error() {
        assert!(matches!(
            Simulator::new().leveraged(&[1.0, 2.0], f64::INFINITY),
            Err(SimulationError::InvalidParameter("leverage", _))
        ));
    }
}
