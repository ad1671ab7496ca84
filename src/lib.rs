//! Incremental line reader over readable descriptors, keeping read-ahead bytes between calls.

/// Shared constants used across the library
pub mod constants;
/// Reader settings and validation
pub mod config;
/// Error types
pub mod error;
/// Raw descriptor reads
#[cfg(unix)]
pub mod fd;
/// Owned line values
pub mod line;
/// Multi-descriptor line reader
pub mod reader;
mod session;
/// Single-source buffered line stream
pub mod stream;
/// Line statistics over a stream
pub mod summary;

// Dependencies of the `gnl` binary only.
use anyhow as _;
use clap as _;
use tracing_subscriber as _;
#[cfg(test)]
use proptest as _;

pub use config::ReaderConfig;
pub use error::{LineReaderError, LineResult};
pub use line::Line;
pub use reader::LineReader;
pub use stream::BufferedLineStream;
pub use summary::{LineSummary, summarize_lines};
