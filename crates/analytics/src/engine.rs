use crate::error::AnalyticsError;
use crate::report::WindowMetrics;
use crate::stats::{period_returns, sharpe_from_returns};
use simulator::detect_bust;

/// A stateless calculator for deriving window metrics at a fixed annualization base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsEngine {
    periods_per_year: u32,
}

impl AnalyticsEngine {
    /// `periods_per_year` is 252 for daily data, 12 for monthly and 1 for annual.
    pub fn new(periods_per_year: u32) -> Result<Self, AnalyticsError> {
        if periods_per_year == 0 {
            return Err(AnalyticsError::ZeroPeriodsPerYear);
        }
        Ok(Self { periods_per_year })
    }

    pub fn periods_per_year(&self) -> u32 {
        self.periods_per_year
    }

    /// Converts a number of holding periods to years.
    pub fn years(&self, periods: usize) -> Result<f64, AnalyticsError> {
        if periods == 0 {
            return Err(AnalyticsError::ZeroWindowSize);
        }
        Ok(periods as f64 / f64::from(self.periods_per_year))
    }

    /// Metrics of an equity path, with geometric annualization.
    ///
    /// A busted path (any value at or below zero) reports zero total return, zero annualized
    /// return and a zero Sharpe ratio.
    pub fn equity_metrics(&self, path: &[f64]) -> Result<WindowMetrics, AnalyticsError> {
        let periods = path.len().saturating_sub(1);
        let years = self.years(periods)?;

        if detect_bust(path) {
            return Ok(WindowMetrics::busted());
        }

        let growth = path[periods] / path[0];
        let annualized_return = growth.powf(1.0 / years) - 1.0;
        if !annualized_return.is_finite() {
            return Err(AnalyticsError::Calculation(format!(
                "annualizing growth {growth} over {years} years is not finite"
            )));
        }

        Ok(WindowMetrics {
            total_return: growth - 1.0,
            annualized_return,
            sharpe_ratio: self.sharpe_ratio(path),
            busted: false,
        })
    }

    /// Metrics of the raw underlying over a window: simple price return, annualized linearly.
    pub fn underlying_metrics(&self, prices: &[f64]) -> Result<WindowMetrics, AnalyticsError> {
        let periods = prices.len().saturating_sub(1);
        let years = self.years(periods)?;

        let start = prices[0];
        let end = prices[periods];
        if !(start.is_finite() && start > 0.0 && end.is_finite()) {
            return Err(AnalyticsError::Calculation(format!(
                "underlying return from price {start} to {end} is undefined"
            )));
        }

        let total_return = end / start - 1.0;
        Ok(WindowMetrics {
            total_return,
            annualized_return: total_return / years,
            sharpe_ratio: self.sharpe_ratio(prices),
            busted: false,
        })
    }

    /// Annualized Sharpe ratio of the period-over-period returns along `path`.
    pub fn sharpe_ratio(&self, path: &[f64]) -> f64 {
        if detect_bust(path) {
            return 0.0;
        }
        sharpe_from_returns(&period_returns(path), self.periods_per_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn rejects_zero_periods_per_year() {
        assert_eq!(
            AnalyticsEngine::new(0),
            Err(AnalyticsError::ZeroPeriodsPerYear)
        );
    }

    #[test]
    fn zero_length_window_is_an_error() {
        let engine = AnalyticsEngine::new(12).unwrap();
        assert_eq!(engine.years(0), Err(AnalyticsError::ZeroWindowSize));
        assert_eq!(
            engine.equity_metrics(&[1.0]),
            Err(AnalyticsError::ZeroWindowSize)
        );
        assert_eq!(
            engine.underlying_metrics(&[]),
            Err(AnalyticsError::ZeroWindowSize)
        );
    }

    #[test]
    fn busted_path_reports_zero() {
        let engine = AnalyticsEngine::new(252).unwrap();
        let metrics = engine.equity_metrics(&[1.0, 0.0]).unwrap();
        assert!(metrics.busted);
        assert_eq!(metrics.total_return, 0.0);
        assert_eq!(metrics.annualized_return, 0.0);
        assert_eq!(metrics.sharpe_ratio, 0.0);
    }

    #[test]
    fn annualizes_geometrically() {
        // 21% over two years at annual sampling is 10% per year.
        let engine = AnalyticsEngine::new(1).unwrap();
        let metrics = engine.equity_metrics(&[1.0, 1.1, 1.21]).unwrap();
        assert!((metrics.total_return - 0.21).abs() < EPS);
        assert!((metrics.annualized_return - 0.10).abs() < EPS);
    }

    #[test]
    fn monthly_window_annualization() {
        let engine = AnalyticsEngine::new(12).unwrap();
        let metrics = engine.equity_metrics(&[1.0, 1.01]).unwrap();
        assert!((metrics.annualized_return - (1.01f64.powi(12) - 1.0)).abs() < EPS);
    }

    #[test]
    fn underlying_is_linear() {
        let engine = AnalyticsEngine::new(1).unwrap();
        let metrics = engine.underlying_metrics(&[100.0, 110.0, 121.0]).unwrap();
        assert!((metrics.total_return - 0.21).abs() < EPS);
        assert!((metrics.annualized_return - 0.105).abs() < EPS);
        assert!(!metrics.busted);
    }

    #[test]
    fn underlying_rejects_non_positive_start() {
        let engine = AnalyticsEngine::new(1).unwrap();
        assert!(matches!(
            engine.underlying_metrics(&[0.0, 1.0]),
            Err(AnalyticsError::Calculation(_))
        ));
    }

    #[test]
    fn sharpe_of_two_point_path_is_zero() {
        let engine = AnalyticsEngine::new(252).unwrap();
        assert_eq!(engine.sharpe_ratio(&[1.0, 1.1]), 0.0);
    }
}
