use thiserror::Error;

/// Reasons a line request is refused before any byte is read.
///
/// Running out of lines is not an error: it is reported as `Ok(None)`.
/// Failures of the underlying read are not surfaced either; they truncate
/// the stream at the failure point.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LineReaderError {
    /// Descriptor is negative or outside the configured limit
    #[error("invalid descriptor {0}")]
    InvalidDescriptor(i32),
    /// Chunk size is zero or exceeds the ceiling
    #[error("invalid chunk size {chunk_size} (expected 1..={max})")]
    InvalidConfiguration {
        /// The rejected chunk size
        chunk_size: usize,
        /// Largest accepted chunk size
        max: usize,
    },
    /// Configuration file could not be loaded
    #[error("config: {0}")]
    Config(String),
}

impl From<std::io::Error> for LineReaderError {
    fn from(value: std::io::Error) -> Self {
        Self::Config(value.to_string())
    }
}

impl From<serde_json::Error> for LineReaderError {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value.to_string())
    }
}

/// Result alias used across the crate
pub type LineResult<T> = Result<T, LineReaderError>;
