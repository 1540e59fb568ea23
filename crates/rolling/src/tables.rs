use analytics::SummaryStatistics;
use core_types::Window;
use serde::Serialize;
use uuid::Uuid;

/// One row of a window table: the window's labels and one value per result column.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowRow {
    pub window: Window,
    pub start_label: String,
    pub end_label: String,
    pub values: Vec<f64>,
}

/// A returns-shaped table: `[start label, end label]` plus one column per result column.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowTable {
    pub start_header: String,
    pub end_header: String,
    pub columns: Vec<String>,
    pub rows: Vec<WindowRow>,
}

impl WindowTable {
    /// The full header row, label columns first.
    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec![self.start_header.clone(), self.end_header.clone()];
        headers.extend(self.columns.iter().cloned());
        headers
    }

    /// All values of the named column, in window order.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row.values[idx]).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The bust ratio of one leverage value. Field names double as the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BustSummaryRow {
    pub leverage: String,
    pub bust_ratio: f64,
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct RollingReport {
    pub run_id: Uuid,
    pub window_count: usize,
    pub returns: WindowTable,
    pub annualized_returns: WindowTable,
    pub bust_summary: Vec<BustSummaryRow>,
    /// Present when the plan requested summary statistics.
    pub summary: Option<Vec<SummaryStatistics>>,
}

impl RollingReport {
    /// Compares the produced tables, ignoring the run identifier.
    pub fn same_results(&self, other: &RollingReport) -> bool {
        self.window_count == other.window_count
            && self.returns == other.returns
            && self.annualized_returns == other.annualized_returns
            && self.bust_summary == other.bust_summary
            && self.summary == other.summary
    }
}
