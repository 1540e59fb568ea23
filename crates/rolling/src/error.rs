use core_types::CoreError;
use simulator::SimulationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RollingError {
    #[error("Configuration error: {0}")]
    Config(#[from] configuration::error::ConfigError),

    #[error("Data error: {0}")]
    Core(#[from] CoreError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Simulation of '{column}' failed in window {start} -> {end}: {source}")]
    Simulation {
        column: String,
        start: String,
        end: String,
        #[source]
        source: SimulationError,
    },

    #[error("Window size must be at least 1")]
    ZeroWindowSize,

    #[error("No windows produced: {observations} observations with a window size of {window_size}")]
    NoWindows {
        observations: usize,
        window_size: usize,
    },

    #[error("A dividend column was requested but the observation series carries no dividends")]
    MissingDividends,

    #[error("Window {start}..={end} was evaluated but is not part of the enumeration")]
    UnknownWindow { start: usize, end: usize },
}
