//! # Core Types
//!
//! The shared vocabulary of the workspace: observations and the ordered series they form,
//! the index windows cut from that series, and the identifiers of result columns.
//!
//! This crate holds data only. It knows nothing about simulation, statistics or I/O.

pub mod enums;
pub mod error;
pub mod label;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{LeverageKey, ResultColumn};
pub use error::CoreError;
pub use label::Label;
pub use structs::{Observation, ObservationSeries, Window};
