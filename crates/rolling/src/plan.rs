use crate::error::RollingError;
use configuration::{RunConfig, SamplingFrequency};
use core_types::{LeverageKey, ResultColumn};

/// Everything the rolling engine needs to know about a run, resolved once up front.
///
/// The result columns (and therefore the leverage keys that name them) are fixed here and
/// reused by every table, so column identity never depends on formatting at merge time.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    window_size: usize,
    frequency: SamplingFrequency,
    columns: Vec<ResultColumn>,
    label_column: String,
    summary: bool,
}

impl RunPlan {
    /// A plan with one leveraged column per key, in the given order.
    pub fn new(
        window_size: usize,
        frequency: SamplingFrequency,
        leverages: Vec<LeverageKey>,
    ) -> Result<Self, RollingError> {
        if window_size == 0 {
            return Err(RollingError::ZeroWindowSize);
        }
        Ok(Self {
            window_size,
            frequency,
            columns: leverages.into_iter().map(ResultColumn::Leveraged).collect(),
            label_column: "date".to_string(),
            summary: false,
        })
    }

    /// Builds the plan from a loaded configuration, validating it first.
    pub fn from_config(config: &RunConfig) -> Result<Self, RollingError> {
        let leverages = config.validate()?;
        let mut plan = Self::new(config.window.size, config.window.frequency, leverages)?
            .with_label_column(&config.data.date_column);

        if config.metrics.underlying {
            plan = plan.with_underlying();
        }
        if config.data.dividend_column.is_some() {
            plan = plan.with_dividends();
        }
        if config.metrics.summary {
            plan = plan.with_summary();
        }
        Ok(plan)
    }

    /// Adds the unleveraged underlying column.
    pub fn with_underlying(mut self) -> Self {
        self.push_column(ResultColumn::Underlying);
        self
    }

    /// Adds the dividend-reinvested column. The series must then carry dividends.
    pub fn with_dividends(mut self) -> Self {
        self.push_column(ResultColumn::Dividend);
        self
    }

    /// Requests the summary statistics table.
    pub fn with_summary(mut self) -> Self {
        self.summary = true;
        self
    }

    /// Names the label column; the window tables use `start_<name>` and `end_<name>`.
    pub fn with_label_column(mut self, name: &str) -> Self {
        self.label_column = name.to_string();
        self
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn frequency(&self) -> SamplingFrequency {
        self.frequency
    }

    pub fn columns(&self) -> &[ResultColumn] {
        &self.columns
    }

    pub fn leverages(&self) -> impl Iterator<Item = &LeverageKey> {
        self.columns.iter().filter_map(ResultColumn::leverage)
    }

    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    pub fn wants_summary(&self) -> bool {
        self.summary
    }

    pub fn wants_dividends(&self) -> bool {
        self.columns.contains(&ResultColumn::Dividend)
    }

    // Leveraged columns come first, then underlying, then dividend.
    fn push_column(&mut self, column: ResultColumn) {
        if self.columns.contains(&column) {
            return;
        }
        self.columns.push(column);
        self.columns.sort_by_key(|c| match c {
            ResultColumn::Leveraged(_) => 0,
            ResultColumn::Underlying => 1,
            ResultColumn::Dividend => 2,
        });
    }
}
