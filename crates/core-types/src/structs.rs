use crate::error::CoreError;
use crate::label::Label;
use serde::{Deserialize, Serialize};

/// A single row of the input price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub label: Label,
    pub price: f64,
    /// Dividend paid at this observation, if the dataset carries dividends.
    pub dividend: Option<f64>,
}

impl Observation {
    pub fn new(label: Label, price: f64) -> Self {
        Self {
            label,
            price,
            dividend: None,
        }
    }

    pub fn with_dividend(mut self, dividend: f64) -> Self {
        self.dividend = Some(dividend);
        self
    }
}

/// A closed index pair `[start, end]` into an `ObservationSeries`.
///
/// A window of size `W` spans `W` holding periods and therefore `W + 1` observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of holding periods covered by the window.
    pub fn periods(&self) -> usize {
        self.end - self.start
    }

    /// Number of observations covered by the window, both endpoints included.
    pub fn observations(&self) -> usize {
        self.periods() + 1
    }
}

/// An ordered observation sequence, stored column-wise so windows can be sliced cheaply.
///
/// Labels are strictly increasing. The series is the only place sorting happens; the
/// simulators downstream assume chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSeries {
    labels: Vec<Label>,
    prices: Vec<f64>,
    dividends: Option<Vec<f64>>,
}

impl ObservationSeries {
    /// Sorts the observations by label (stable) and builds the series.
    ///
    /// Duplicate labels are rejected rather than merged. If any observation carries a
    /// dividend, the series carries a dividend column and missing entries count as zero.
    pub fn from_unsorted(mut observations: Vec<Observation>) -> Result<Self, CoreError> {
        observations.sort_by(|a, b| a.label.cmp(&b.label));

        if let Some(pair) = observations.windows(2).find(|pair| pair[0].label == pair[1].label) {
            return Err(CoreError::DuplicateLabel(pair[0].label.to_string()));
        }

        let has_dividends = observations.iter().any(|o| o.dividend.is_some());
        let dividends = has_dividends.then(|| {
            observations
                .iter()
                .map(|o| o.dividend.unwrap_or(0.0))
                .collect()
        });
        let prices = observations.iter().map(|o| o.price).collect();
        let labels = observations.into_iter().map(|o| o.label).collect();

        tracing::debug!(has_dividends, "Built observation series");

        Ok(Self {
            labels,
            prices,
            dividends,
        })
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn has_dividends(&self) -> bool {
        self.dividends.is_some()
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn label(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }

    /// The prices from `window.start` through `window.end`, inclusive.
    pub fn price_window(&self, window: Window) -> Result<&[f64], CoreError> {
        self.check_bounds(window)?;
        Ok(&self.prices[window.start..=window.end])
    }

    /// The dividends aligned with `price_window`, or `None` if the series has no dividends.
    pub fn dividend_window(&self, window: Window) -> Result<Option<&[f64]>, CoreError> {
        self.check_bounds(window)?;
        Ok(self
            .dividends
            .as_ref()
            .map(|d| &d[window.start..=window.end]))
    }

    fn check_bounds(&self, window: Window) -> Result<(), CoreError> {
        if window.start > window.end || window.end >= self.len() {
            return Err(CoreError::WindowOutOfBounds {
                start: window.start,
                end: window.end,
                len: self.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(label: &str, price: f64) -> Observation {
        Observation::new(Label::parse(label), price)
    }

    #[test]
    fn sorts_by_label() {
        let series = ObservationSeries::from_unsorted(vec![
            obs("2024-01-03", 3.0),
            obs("2024-01-01", 1.0),
            obs("2024-01-02", 2.0),
        ])
        .unwrap();

        assert_eq!(series.prices(), &[1.0, 2.0, 3.0]);
        assert_eq!(series.label(0), Some(&Label::parse("2024-01-01")));
    }

    #[test]
    fn rejects_duplicate_labels() {
        let err = ObservationSeries::from_unsorted(vec![obs("day1", 1.0), obs("day1", 2.0)])
            .unwrap_err();
        assert_eq!(err, CoreError::DuplicateLabel("day1".to_string()));
    }

    #[test]
    fn slices_windows_inclusively() {
        let series = ObservationSeries::from_unsorted(vec![
            obs("1", 10.0),
            obs("2", 11.0),
            obs("3", 12.0),
            obs("4", 13.0),
        ])
        .unwrap();

        let window = Window::new(1, 3);
        assert_eq!(window.observations(), 3);
        assert_eq!(series.price_window(window).unwrap(), &[11.0, 12.0, 13.0]);
        assert_eq!(series.dividend_window(window).unwrap(), None);
        assert!(series.price_window(Window::new(2, 4)).is_err());
    }

    #[test]
    fn missing_dividends_count_as_zero() {
        let series = ObservationSeries::from_unsorted(vec![
            obs("1", 10.0),
            obs("2", 11.0).with_dividend(0.5),
        ])
        .unwrap();

        assert!(series.has_dividends());
        assert_eq!(
            series.dividend_window(Window::new(0, 1)).unwrap(),
            Some(&[0.0, 0.5][..])
        );
    }
}
