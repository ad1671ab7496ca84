use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::stream::BufferedLineStream;

/// Totals gathered while draining a stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSummary {
    /// Number of lines returned
    pub lines: u64,
    /// Lines ending with `\n`
    pub terminated: u64,
    /// Lines cut by end of input (at most one)
    pub unterminated: u64,
    /// Total bytes returned, terminators included
    pub bytes: u64,
}

/// Drain `stream` and count what it yields
///
/// Every remaining line is consumed; afterwards the stream only returns None.
pub fn summarize_lines<R: Read>(stream: &mut BufferedLineStream<R>) -> LineSummary {
    let mut summary = LineSummary::default();

    while let Some(line) = stream.next_line() {
        summary.lines += 1;
        summary.bytes += line.len() as u64;
        if line.is_terminated() {
            summary.terminated += 1;
        } else {
            summary.unterminated += 1;
        }
    }

    tracing::debug!(lines = summary.lines, bytes = summary.bytes, "stream summarized");
    summary
}
