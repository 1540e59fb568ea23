use crate::error::AnalyticsError;
use crate::stats::{mean, percentile, sample_std};
use serde::{Deserialize, Serialize};

/// The outcome of one (result column, window) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowMetrics {
    pub total_return: f64,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    pub busted: bool,
}

impl WindowMetrics {
    /// The floor reported for an insolvent window.
    pub fn busted() -> Self {
        Self {
            total_return: 0.0,
            annualized_return: 0.0,
            sharpe_ratio: 0.0,
            busted: true,
        }
    }
}

/// Distribution statistics of one result column across all windows.
///
/// Field names double as the CSV header of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub portfolio: String,
    pub mean_total_return: f64,
    pub iqr_total_return: f64,
    pub mean_cagr: f64,
    /// Sample standard deviation; `0.0` when there is a single window.
    pub std_cagr: f64,
    pub bust_ratio: f64,
    pub avg_sharpe: f64,
    pub min_total_return: f64,
    pub max_total_return: f64,
}

/// Summarizes the per-window metrics of one column.
///
/// # Arguments
///
/// * `portfolio` - The column name, carried through to the output row.
/// * `metrics` - One entry per window, in any order.
/// * `bust_ratio` - The column's bust ratio, or `0.0` for columns without leverage.
pub fn summarize(
    portfolio: &str,
    metrics: &[WindowMetrics],
    bust_ratio: f64,
) -> Result<SummaryStatistics, AnalyticsError> {
    if metrics.is_empty() {
        return Err(AnalyticsError::NotEnoughData(format!(
            "column '{portfolio}' has no windows to summarize"
        )));
    }

    let mut total: Vec<f64> = metrics.iter().map(|m| m.total_return).collect();
    let cagr: Vec<f64> = metrics.iter().map(|m| m.annualized_return).collect();
    let sharpe: Vec<f64> = metrics.iter().map(|m| m.sharpe_ratio).collect();

    let mean_total_return = mean(&total).unwrap_or_default();
    total.sort_by(f64::total_cmp);

    let q1 = percentile(&total, 0.25).unwrap_or_default();
    let q3 = percentile(&total, 0.75).unwrap_or_default();

    Ok(SummaryStatistics {
        portfolio: portfolio.to_string(),
        mean_total_return,
        iqr_total_return: q3 - q1,
        mean_cagr: mean(&cagr).unwrap_or_default(),
        std_cagr: sample_std(&cagr).unwrap_or_default(),
        bust_ratio,
        avg_sharpe: mean(&sharpe).unwrap_or_default(),
        min_total_return: total.first().copied().unwrap_or_default(),
        max_total_return: total.last().copied().unwrap_or_default(),
    })
}
