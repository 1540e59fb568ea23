//! # Rolling-Window Engine
//!
//! Slides a fixed-size window over an observation series, simulates every requested result
//! column inside each window and assembles the output tables:
//!
//! - returns and annualized returns, one row per window and one column per result column,
//! - the bust ratio of each leverage value,
//! - optional per-column summary statistics.
//!
//! A run either completes deterministically or fails with a `RollingError`.

pub mod engine;
pub mod enumerator;
pub mod error;
pub mod plan;
pub mod tables;

pub use engine::{RollingEngine, bust_ratio};
pub use enumerator::identify_windows;
pub use error::RollingError;
pub use plan::RunPlan;
pub use tables::{BustSummaryRow, RollingReport, WindowRow, WindowTable};
