use std::io::{ErrorKind, Read};

use crate::constants::INITIAL_PENDING_CAPACITY;
use crate::line::Line;

/// Read-ahead state of one stream.
///
/// `pending[start..]` holds bytes read from the source but not yet returned.
/// The consumed prefix `pending[..start]` is only compacted away right before
/// the next read, so extracting several buffered lines never moves bytes.
#[derive(Debug, Default)]
pub(crate) struct Session {
    pending: Vec<u8>,
    start: usize,
    /// Bytes after `start` already known to contain no newline
    scanned: usize,
    /// Read target, zero-filled once per chunk size and reused across reads
    chunk: Vec<u8>,
    drained: bool,
}

impl Session {
    pub(crate) fn new() -> Self {
        Self {
            pending: Vec::with_capacity(INITIAL_PENDING_CAPACITY),
            ..Self::default()
        }
    }

    /// Produce the next line, topping up from `source` in `chunk_size` reads.
    ///
    /// Returns `None` once the source reported end-of-stream (or failed) and
    /// every buffered byte has been handed out. After that the source is
    /// never read again.
    pub(crate) fn next_line<R: Read + ?Sized>(
        &mut self,
        source: &mut R,
        chunk_size: usize,
    ) -> Option<Line> {
        if self.drained {
            return None;
        }
        let newline = self.fill(source, chunk_size);
        self.extract(newline)
    }

    /// Number of bytes buffered but not yet returned
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len() - self.start
    }

    pub(crate) fn is_drained(&self) -> bool {
        self.drained
    }

    /// Read until a newline is buffered; returns its absolute index in `pending`.
    fn fill<R: Read + ?Sized>(&mut self, source: &mut R, chunk_size: usize) -> Option<usize> {
        loop {
            let from = self.start + self.scanned;
            if let Some(offset) = self.pending[from..].iter().position(|&b| b == b'\n') {
                return Some(from + offset);
            }
            self.scanned = self.pending.len() - self.start;
            self.compact();

            if self.chunk.len() != chunk_size {
                self.chunk = vec![0; chunk_size];
            }
            match source.read(&mut self.chunk) {
                Ok(0) => {
                    tracing::trace!(buffered = self.pending_len(), "end of stream");
                    return None;
                }
                Ok(n) => {
                    self.pending.extend_from_slice(&self.chunk[..n]);
                    tracing::trace!(requested = chunk_size, read = n, "filled chunk");
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::debug!(
                        error = %e,
                        buffered = self.pending_len(),
                        "read failed, treating buffered bytes as final line"
                    );
                    return None;
                }
            }
        }
    }

    fn extract(&mut self, newline: Option<usize>) -> Option<Line> {
        match newline {
            Some(end) => {
                let line = Line::new(self.pending[self.start..=end].to_vec());
                self.start = end + 1;
                self.scanned = 0;
                if self.start == self.pending.len() {
                    self.pending.clear();
                    self.start = 0;
                }
                Some(line)
            }
            None => {
                let line = (self.pending_len() > 0)
                    .then(|| Line::new(self.pending[self.start..].to_vec()));
                self.pending = Vec::new();
                self.chunk = Vec::new();
                self.start = 0;
                self.scanned = 0;
                self.drained = true;
                tracing::debug!(final_line = line.is_some(), "session drained");
                line
            }
        }
    }

    fn compact(&mut self) {
        if self.start > 0 {
            self.pending.drain(..self.start);
            self.start = 0;
        }
    }
}
