//! # Charts Crate
//!
//! Renders box-and-whisker plots of window returns as standalone SVG documents.
//!
//! - `boxplot_returns`: One box per result column of a `WindowTable`, optionally on a
//!   logarithmic value axis.
//! - `write_svg`: Persists a rendered plot.

pub mod boxplot;
pub mod error;

pub use boxplot::{BoxplotOptions, boxplot_returns, write_svg};
pub use error::ChartError;
