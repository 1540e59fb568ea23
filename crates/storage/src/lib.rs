//! # Storage Crate
//!
//! The file-system side of a run. Reads the observation file into an `ObservationSeries`
//! and writes the result tables back out as CSV.
//!
//! ## Public API
//!
//! - `load_observations`: Reads and validates the input CSV. Referenced columns are checked
//!   against the header before any row is parsed.
//! - `RunOutputs`: Names every artifact of one run (`<name>_lev_<keys>_run_<timestamp>.<ext>`).
//! - `CsvRepository`: Writes the returns, annualized returns, bust summary and summary
//!   statistics tables of a `RollingReport`.
//! - `StorageError`: The specific error types that can be returned from this crate.

pub mod error;
pub mod naming;
pub mod reader;
pub mod repository;

pub use error::StorageError;
pub use naming::RunOutputs;
pub use reader::load_observations;
pub use repository::CsvRepository;
