use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Column '{0}' is not part of the table")]
    UnknownColumn(String),

    #[error("At least one column is required to draw a plot")]
    NoColumns,

    #[error("Failed to write plot to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
