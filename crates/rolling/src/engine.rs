use crate::enumerator::identify_windows;
use crate::error::RollingError;
use crate::plan::RunPlan;
use crate::tables::{BustSummaryRow, RollingReport, WindowRow, WindowTable};
use analytics::{AnalyticsEngine, WindowMetrics, summarize};
use core_types::{ObservationSeries, ResultColumn, Window};
use indicatif::ProgressBar;
use rayon::prelude::*;
use simulator::{SimulationError, Simulator, validate_prices};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

const HIGH_BUST_RATIO: f64 = 0.5;

/// Date formats tried after the frequency's own format when that one renders two windows
/// with identical start and end labels.
const FALLBACK_LABEL_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y-%m-%d %H:%M:%S"];

/// The master engine for rolling-window runs.
///
/// For every result column it evaluates every window, then assembles the returns,
/// annualized-returns and bust-summary tables (plus summary statistics when requested).
/// The engine holds no state between runs; identical inputs produce identical tables.
pub struct RollingEngine {
    plan: RunPlan,
    simulator: Simulator,
    analytics: AnalyticsEngine,
}

impl RollingEngine {
    pub fn new(plan: RunPlan) -> Result<Self, RollingError> {
        let analytics = AnalyticsEngine::new(plan.frequency().periods_per_year())?;
        Ok(Self {
            plan,
            simulator: Simulator::new(),
            analytics,
        })
    }

    pub fn plan(&self) -> &RunPlan {
        &self.plan
    }

    /// Runs the whole computation without progress reporting.
    pub fn run(&self, series: &ObservationSeries) -> Result<RollingReport, RollingError> {
        self.run_with_progress(series, &ProgressBar::hidden())
    }

    /// The main entry point. `progress` advances once per completed result column.
    ///
    /// Any failing window aborts the run; there is no partial result.
    pub fn run_with_progress(
        &self,
        series: &ObservationSeries,
        progress: &ProgressBar,
    ) -> Result<RollingReport, RollingError> {
        let run_id = Uuid::new_v4();
        let columns = self.plan.columns();

        if self.plan.wants_dividends() && !series.has_dividends() {
            return Err(RollingError::MissingDividends);
        }

        let windows = identify_windows(series.len(), self.plan.window_size())?;
        if windows.is_empty() {
            return Err(RollingError::NoWindows {
                observations: series.len(),
                window_size: self.plan.window_size(),
            });
        }

        tracing::info!(
            %run_id,
            windows = windows.len(),
            columns = columns.len(),
            window_size = self.plan.window_size(),
            "Starting rolling-window run"
        );
        progress.set_length(columns.len() as u64);
        let labels = self.render_labels(series, &windows);

        // Cells are keyed by window identity and filled column by column.
        let mut cells: BTreeMap<Window, Vec<Option<WindowMetrics>>> = windows
            .iter()
            .map(|window| (*window, vec![None; columns.len()]))
            .collect();
        let mut bust_summary = Vec::new();
        let mut column_metrics = Vec::with_capacity(columns.len());

        for (idx, column) in columns.iter().enumerate() {
            progress.set_message(column.name());

            let outcomes = windows
                .par_iter()
                .map(|window| self.evaluate(series, &labels, column, *window))
                .collect::<Result<Vec<_>, _>>()?;

            for (window, metrics) in windows.iter().zip(&outcomes) {
                let row = cells.get_mut(window).ok_or(RollingError::UnknownWindow {
                    start: window.start,
                    end: window.end,
                })?;
                row[idx] = Some(*metrics);
            }

            if let Some(leverage) = column.leverage() {
                let busted = outcomes.iter().filter(|m| m.busted).count();
                let ratio = bust_ratio(busted, outcomes.len())?;
                if busted == outcomes.len() {
                    tracing::warn!(leverage = %leverage, "Every window went bust");
                } else if ratio >= HIGH_BUST_RATIO {
                    tracing::warn!(leverage = %leverage, ratio, "High bust ratio");
                }
                tracing::debug!(leverage = %leverage, busted, ratio, "Column complete");
                bust_summary.push(BustSummaryRow {
                    leverage: leverage.key().to_string(),
                    bust_ratio: ratio,
                });
            }

            column_metrics.push(outcomes);
            progress.inc(1);
        }

        let summary = if self.plan.wants_summary() {
            Some(self.summarize(&column_metrics, &bust_summary)?)
        } else {
            None
        };
        let (returns, annualized_returns) = self.materialize(&labels, cells)?;

        tracing::info!(%run_id, "Rolling-window run complete");

        Ok(RollingReport {
            run_id,
            window_count: windows.len(),
            returns,
            annualized_returns,
            bust_summary,
            summary,
        })
    }

    /// Simulates one (column, window) pair and derives its metrics.
    fn evaluate(
        &self,
        series: &ObservationSeries,
        labels: &[String],
        column: &ResultColumn,
        window: Window,
    ) -> Result<WindowMetrics, RollingError> {
        let prices = series.price_window(window)?;
        let simulation_error = |source: SimulationError| RollingError::Simulation {
            column: column.name(),
            start: labels.get(window.start).cloned().unwrap_or_default(),
            end: labels.get(window.end).cloned().unwrap_or_default(),
            source,
        };

        let path = match column {
            ResultColumn::Leveraged(leverage) => self
                .simulator
                .leveraged(prices, leverage.value())
                .map_err(simulation_error)?,
            ResultColumn::Underlying => {
                // No equity path, but the prices must still be usable.
                validate_prices(prices).map_err(simulation_error)?;
                return Ok(self.analytics.underlying_metrics(prices)?);
            }
            ResultColumn::Dividend => {
                let dividends = series
                    .dividend_window(window)?
                    .ok_or(RollingError::MissingDividends)?;
                self.simulator
                    .dividend_adjusted(prices, dividends)
                    .map_err(simulation_error)?
            }
        };

        Ok(self.analytics.equity_metrics(&path)?)
    }

    fn summarize(
        &self,
        column_metrics: &[Vec<WindowMetrics>],
        bust_summary: &[BustSummaryRow],
    ) -> Result<Vec<analytics::SummaryStatistics>, RollingError> {
        let mut busts = bust_summary.iter();
        self.plan
            .columns()
            .iter()
            .zip(column_metrics)
            .map(|(column, metrics)| -> Result<_, RollingError> {
                let ratio = match column {
                    ResultColumn::Leveraged(_) => busts.next().map_or(0.0, |row| row.bust_ratio),
                    _ => 0.0,
                };
                Ok(summarize(&column.name(), metrics, ratio)?)
            })
            .collect()
    }

    fn materialize(
        &self,
        labels: &[String],
        cells: BTreeMap<Window, Vec<Option<WindowMetrics>>>,
    ) -> Result<(WindowTable, WindowTable), RollingError> {
        let label_column = self.plan.label_column();
        let column_names: Vec<String> = self.plan.columns().iter().map(|c| c.name()).collect();
        let empty_table = || WindowTable {
            start_header: format!("start_{label_column}"),
            end_header: format!("end_{label_column}"),
            columns: column_names.clone(),
            rows: Vec::with_capacity(cells.len()),
        };
        let mut returns = empty_table();
        let mut annualized = empty_table();

        for (window, row) in cells {
            let metrics = row
                .into_iter()
                .collect::<Option<Vec<_>>>()
                .ok_or(RollingError::UnknownWindow {
                    start: window.start,
                    end: window.end,
                })?;
            let start_label = labels.get(window.start).cloned().unwrap_or_default();
            let end_label = labels.get(window.end).cloned().unwrap_or_default();

            returns.rows.push(WindowRow {
                window,
                start_label: start_label.clone(),
                end_label: end_label.clone(),
                values: metrics.iter().map(|m| m.total_return).collect(),
            });
            annualized.rows.push(WindowRow {
                window,
                start_label,
                end_label,
                values: metrics.iter().map(|m| m.annualized_return).collect(),
            });
        }

        Ok((returns, annualized))
    }

    /// Renders every label at the sampling frequency, e.g. `2024-01` for monthly data.
    ///
    /// When that makes two windows indistinguishable (daily dates at a monthly frequency), the
    /// labels are re-rendered with the first finer format that keeps every window distinct.
    fn render_labels(&self, series: &ObservationSeries, windows: &[Window]) -> Vec<String> {
        let frequency_format = self.plan.frequency().label_format();
        let render = |format: &str| -> Vec<String> {
            (0..series.len())
                .map(|i| series.label(i).map(|l| l.render(format)).unwrap_or_default())
                .collect()
        };

        let mut labels = render(frequency_format);
        if windows_are_distinct(&labels, windows) {
            return labels;
        }
        for format in FALLBACK_LABEL_FORMATS {
            labels = render(format);
            if windows_are_distinct(&labels, windows) {
                break;
            }
        }
        tracing::warn!(
            frequency_format,
            "Labels collide at the sampling frequency; writing them at full resolution"
        );
        labels
    }
}

fn windows_are_distinct(labels: &[String], windows: &[Window]) -> bool {
    let mut seen = HashSet::with_capacity(windows.len());
    windows
        .iter()
        .all(|w| seen.insert((labels.get(w.start), labels.get(w.end))))
}

/// Fraction of windows that went bust. Zero windows is an error, never a silent NaN.
pub fn bust_ratio(busted: usize, total: usize) -> Result<f64, RollingError> {
    if total == 0 {
        return Err(RollingError::NoWindows {
            observations: 0,
            window_size: 0,
        });
    }
    Ok(busted as f64 / total as f64)
}
