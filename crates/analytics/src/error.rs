use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    NotEnoughData(String),

    #[error("Calculation error: a window of zero periods cannot be annualized")]
    ZeroWindowSize,

    #[error("Calculation error: periods per year must be positive")]
    ZeroPeriodsPerYear,

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
