//! Statistical helpers shared by the window metrics and the summary table.

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (`n - 1` denominator), or `None` for fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - avg;
            diff * diff
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Linearly interpolated percentile of an ascending slice, `p` in `[0, 1]`.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let clamped = p.clamp(0.0, 1.0);
    let pos = clamped * (sorted.len() as f64 - 1.0);
    let idx = pos.floor() as usize;
    let frac = pos - idx as f64;
    if idx + 1 >= sorted.len() {
        Some(sorted[idx])
    } else {
        let lower = sorted[idx];
        let upper = sorted[idx + 1];
        Some(lower + (upper - lower) * frac)
    }
}

/// Period-over-period simple returns of a path. One fewer value than the path.
pub fn period_returns(path: &[f64]) -> Vec<f64> {
    path.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Annualized Sharpe ratio of per-period returns with a zero risk-free rate.
///
/// Defined as `0.0` when there are fewer than two returns or the deviation is zero or not finite.
pub fn sharpe_from_returns(returns: &[f64], periods_per_year: u32) -> f64 {
    let (Some(avg), Some(std)) = (mean(returns), sample_std(returns)) else {
        return 0.0;
    };
    if !std.is_finite() || std <= 0.0 || !avg.is_finite() {
        return 0.0;
    }
    avg / std * f64::from(periods_per_year).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[0.1, 0.2, 0.3]).map(|m| (m * 10.0).round()), Some(2.0));
        assert_eq!(sample_std(&[1.0]), None);

        let std = sample_std(&[0.1, 0.2]).unwrap();
        assert!((std - 0.070710678).abs() < 1e-8);
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [0.1, 0.2];
        assert!((percentile(&sorted, 0.25).unwrap() - 0.125).abs() < 1e-12);
        assert!((percentile(&sorted, 0.75).unwrap() - 0.175).abs() < 1e-12);
        assert_eq!(percentile(&[5.0], 0.5), Some(5.0));
        assert_eq!(percentile(&[], 0.5), None);
    }

    #[test]
    fn test_period_returns() {
        let returns = period_returns(&[1.0, 2.0, 1.0]);
        assert_eq!(returns, vec![1.0, -0.5]);
    }

    #[test]
    fn test_sharpe_degenerate_cases() {
        assert_eq!(sharpe_from_returns(&[], 252), 0.0);
        assert_eq!(sharpe_from_returns(&[0.01], 252), 0.0);
        assert_eq!(sharpe_from_returns(&[0.25, 0.25, 0.25], 252), 0.0);
    }

    #[test]
    fn test_sharpe_annualizes_by_sqrt_periods() {
        let returns = [0.01, 0.03];
        let per_period = 0.02 / sample_std(&returns).unwrap();
        let annual = sharpe_from_returns(&returns, 12);
        assert!((annual - per_period * 12f64.sqrt()).abs() < 1e-12);
    }
}
