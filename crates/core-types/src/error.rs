use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Duplicate observation label '{0}': windows would not be uniquely identifiable")]
    DuplicateLabel(String),

    #[error("Window {start}..={end} is out of bounds for a series of {len} observations")]
    WindowOutOfBounds { start: usize, end: usize, len: usize },
}
