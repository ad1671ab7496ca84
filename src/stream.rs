use std::io::Read;

use crate::config::{ReaderConfig, validate_chunk_size};
use crate::constants::DEFAULT_CHUNK_SIZE;
use crate::error::LineResult;
use crate::line::Line;
use crate::session::Session;

/// Line stream over a single readable source.
///
/// Bytes read past the end of the current line are kept for the next call.
#[derive(Debug)]
pub struct BufferedLineStream<R> {
    /// Underlying source, read in `chunk_size` pieces
    reader: R,
    /// Chunk size, `None` when the configured value was rejected
    chunk_size: Option<usize>,
    /// Read-ahead bytes carried between calls
    session: Session,
}

impl<R: Read> BufferedLineStream<R> {
    /// Create a new stream with default chunk size
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    /// Create a new stream with custom chunk size
    ///
    /// An out-of-range chunk size is accepted here but makes every
    /// `next_line()` call return `None`. Use [`Self::try_with_config`] to
    /// reject it up front.
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        let chunk_size = match validate_chunk_size(chunk_size) {
            Ok(()) => Some(chunk_size),
            Err(e) => {
                tracing::debug!(error = %e, "stream will yield no lines");
                None
            }
        };
        Self {
            reader,
            chunk_size,
            session: Session::new(),
        }
    }

    /// Create a new stream from validated settings
    pub fn try_with_config(reader: R, config: &ReaderConfig) -> LineResult<Self> {
        config.validate()?;
        Ok(Self::with_chunk_size(reader, config.chunk_size))
    }

    /// Get the next line, terminator included
    ///
    /// Returns None once the source is exhausted and every buffered byte
    /// was returned, and on every call after that.
    pub fn next_line(&mut self) -> Option<Line> {
        let chunk_size = self.chunk_size?;
        self.session.next_line(&mut self.reader, chunk_size)
    }

    /// Whether the source hit end-of-stream and nothing is left to return
    pub fn is_drained(&self) -> bool {
        self.session.is_drained()
    }

    /// Bytes read ahead but not yet returned
    pub fn pending_len(&self) -> usize {
        self.session.pending_len()
    }

    /// Give back the source; buffered bytes are discarded
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for BufferedLineStream<R> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        self.next_line()
    }
}
