//! # Window Analytics
//!
//! Turns equity and price paths into per-window return metrics, and per-column return
//! distributions into summary statistics.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O and no knowledge of how paths were produced.
//! - **Bust override:** an insolvent path reports `0.0` for every return metric instead of a
//!   geometric return that would be undefined or meaningless.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: per-window metrics at a fixed annualization base.
//! - `WindowMetrics`: the outcome of one (column, window) pair.
//! - `summarize` / `SummaryStatistics`: distribution statistics for a result column.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{SummaryStatistics, WindowMetrics, summarize};
