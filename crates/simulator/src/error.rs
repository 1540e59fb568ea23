use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Price path needs at least two observations, got {0}")]
    EmptyPath(usize),

    #[error("Price {price} at offset {index} is not a positive finite number; the position size is undefined")]
    NonPositivePrice { index: usize, price: f64 },

    #[error("Dividend {value} at offset {index} is not a finite number")]
    InvalidDividend { index: usize, value: f64 },

    #[error("Price and dividend paths differ in length ({prices} vs {dividends})")]
    LengthMismatch { prices: usize, dividends: usize },

    #[error("Invalid {0}: {1}")]
    InvalidParameter(&'static str, f64),

    #[error("Equity overflowed to a non-finite value at offset {0}")]
    NonFiniteEquity(usize),
}
