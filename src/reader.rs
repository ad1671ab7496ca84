use std::collections::HashMap;
use std::io::Read;

use crate::config::ReaderConfig;
use crate::error::LineResult;
use crate::line::Line;
use crate::session::Session;

/// Line reader tracking a separate read-ahead buffer per descriptor.
///
/// Descriptors are plain numbers. Sessions are created on first use and
/// stay in the table after their stream is exhausted, so a drained
/// descriptor keeps returning None without reading again. Call
/// [`LineReader::forget`] when closing a descriptor, before its number is
/// reused for another stream.
#[derive(Debug, Default)]
pub struct LineReader {
    config: ReaderConfig,
    sessions: HashMap<i32, Session>,
}

impl LineReader {
    /// Create a reader with the given settings
    ///
    /// Settings are checked on every call, so an invalid chunk size makes
    /// every request fail rather than this constructor.
    pub fn new(config: ReaderConfig) -> Self {
        Self {
            config,
            sessions: HashMap::new(),
        }
    }

    /// Create a reader with default settings and a custom chunk size
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self::new(ReaderConfig::with_chunk_size(chunk_size))
    }

    /// Settings in use
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Next line of `source`, tracked under descriptor `fd`
    ///
    /// Returns None at end of input and also when the descriptor or the
    /// chunk size is rejected; use [`Self::try_next_line_from`] to tell them
    /// apart.
    pub fn next_line_from<R: Read + ?Sized>(&mut self, fd: i32, source: &mut R) -> Option<Line> {
        match self.try_next_line_from(fd, source) {
            Ok(line) => line,
            Err(e) => {
                tracing::debug!(fd, error = %e, "line request rejected");
                None
            }
        }
    }

    /// Next line of `source`, tracked under descriptor `fd`
    ///
    /// `Ok(None)` means end of input. Rejected requests leave every session
    /// untouched and read nothing.
    pub fn try_next_line_from<R: Read + ?Sized>(
        &mut self,
        fd: i32,
        source: &mut R,
    ) -> LineResult<Option<Line>> {
        self.config.check_descriptor(fd)?;
        self.config.validate()?;

        let session = self.sessions.entry(fd).or_insert_with(Session::new);
        Ok(session.next_line(source, self.config.chunk_size))
    }

    /// Next line read from the OS descriptor `fd`
    #[cfg(unix)]
    pub fn next_line(&mut self, fd: i32) -> Option<Line> {
        self.next_line_from(fd, &mut crate::fd::RawDescriptor::new(fd))
    }

    /// Next line read from the OS descriptor `fd`, reporting rejections
    #[cfg(unix)]
    pub fn try_next_line(&mut self, fd: i32) -> LineResult<Option<Line>> {
        self.try_next_line_from(fd, &mut crate::fd::RawDescriptor::new(fd))
    }

    /// Drop all state of `fd`, drained or not; returns whether any existed
    pub fn forget(&mut self, fd: i32) -> bool {
        self.sessions.remove(&fd).is_some()
    }

    /// Bytes read ahead for `fd` but not yet returned
    pub fn pending_len(&self, fd: i32) -> usize {
        self.sessions.get(&fd).map_or(0, Session::pending_len)
    }

    /// Whether `fd` currently has a session
    pub fn is_tracked(&self, fd: i32) -> bool {
        self.sessions.contains_key(&fd)
    }

    /// Whether `fd` reached end of input and every line was returned
    pub fn is_drained(&self, fd: i32) -> bool {
        self.sessions.get(&fd).is_some_and(Session::is_drained)
    }

    /// Descriptors with a session, in ascending order
    pub fn tracked_descriptors(&self) -> Vec<i32> {
        let mut fds: Vec<i32> = self.sessions.keys().copied().collect();
        fds.sort_unstable();
        fds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LineReaderError;
    use std::io::Cursor;

    fn bytes(line: Option<Line>) -> Option<Vec<u8>> {
        line.map(Line::into_bytes)
    }

    #[test]
    fn test_interleaved_descriptors_stay_independent() {
        let mut reader = LineReader::with_chunk_size(3);
        let mut a = Cursor::new(b"a1\na2\na3".to_vec());
        let mut b = Cursor::new(b"b1\nb2\n".to_vec());

        assert_eq!(bytes(reader.next_line_from(3, &mut a)), Some(b"a1\n".to_vec()));
        assert_eq!(bytes(reader.next_line_from(4, &mut b)), Some(b"b1\n".to_vec()));
        assert_eq!(bytes(reader.next_line_from(3, &mut a)), Some(b"a2\n".to_vec()));
        assert_eq!(bytes(reader.next_line_from(4, &mut b)), Some(b"b2\n".to_vec()));
        assert_eq!(bytes(reader.next_line_from(4, &mut b)), None);
        assert_eq!(bytes(reader.next_line_from(3, &mut a)), Some(b"a3".to_vec()));
        assert_eq!(bytes(reader.next_line_from(3, &mut a)), None);
        assert_eq!(reader.tracked_descriptors(), vec![3, 4]);
        assert!(reader.is_drained(3) && reader.is_drained(4));
    }

    #[test]
    fn test_negative_descriptor_rejected() {
        let mut reader = LineReader::default();
        let mut source = Cursor::new(b"data\n".to_vec());

        assert_eq!(
            reader.try_next_line_from(-1, &mut source),
            Err(LineReaderError::InvalidDescriptor(-1))
        );
        assert!(reader.next_line_from(-1, &mut source).is_none());
        assert_eq!(source.position(), 0);
        assert!(reader.tracked_descriptors().is_empty());
    }

    #[test]
    fn test_descriptor_limit() {
        let mut reader = LineReader::new(ReaderConfig {
            descriptor_limit: Some(8),
            ..ReaderConfig::default()
        });
        let mut source = Cursor::new(b"x\n".to_vec());

        assert!(matches!(
            reader.try_next_line_from(8, &mut source),
            Err(LineReaderError::InvalidDescriptor(8))
        ));
        assert_eq!(bytes(reader.next_line_from(7, &mut source)), Some(b"x\n".to_vec()));
    }

    #[test]
    fn test_invalid_chunk_size_rejected() {
        let mut reader = LineReader::with_chunk_size(0);
        let mut source = Cursor::new(b"x\n".to_vec());

        assert!(matches!(
            reader.try_next_line_from(0, &mut source),
            Err(LineReaderError::InvalidConfiguration { chunk_size: 0, .. })
        ));
        assert!(!reader.is_tracked(0));
    }

    #[test]
    fn test_pending_and_forget() {
        let mut reader = LineReader::with_chunk_size(64);
        assert_eq!(reader.config().chunk_size, 64);
        let mut source = Cursor::new(b"one\ntwo\nthree".to_vec());

        assert_eq!(bytes(reader.next_line_from(5, &mut source)), Some(b"one\n".to_vec()));
        assert_eq!(reader.pending_len(5), 9);
        assert_eq!(reader.tracked_descriptors(), vec![5]);

        assert!(reader.forget(5));
        assert!(!reader.forget(5));
        assert_eq!(reader.pending_len(5), 0);
        // The source is already at its end; the forgotten bytes are gone.
        assert!(reader.next_line_from(5, &mut source).is_none());
    }

    /// Reports end-of-stream once, then has more data
    struct LateReader {
        calls: usize,
        late: Cursor<Vec<u8>>,
    }

    impl Read for LateReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.calls += 1;
            if self.calls == 1 {
                return Ok(0);
            }
            self.late.read(buf)
        }
    }

    #[test]
    fn test_drained_descriptor_stays_drained() {
        let mut reader = LineReader::with_chunk_size(4);
        let mut source = LateReader {
            calls: 0,
            late: Cursor::new(b"late\n".to_vec()),
        };

        assert!(reader.next_line_from(3, &mut source).is_none());
        assert!(reader.is_drained(3));
        for _ in 0..3 {
            assert!(reader.next_line_from(3, &mut source).is_none());
        }
        assert_eq!(source.calls, 1);

        // Forgetting the descriptor starts a new session on the same source.
        assert!(reader.forget(3));
        assert_eq!(bytes(reader.next_line_from(3, &mut source)), Some(b"late\n".to_vec()));
    }

    #[test]
    fn test_reused_descriptor_starts_clean() {
        let mut reader = LineReader::with_chunk_size(2);
        let mut first = Cursor::new(b"old".to_vec());
        assert_eq!(bytes(reader.next_line_from(3, &mut first)), Some(b"old".to_vec()));
        assert!(reader.next_line_from(3, &mut first).is_none());
        assert!(reader.forget(3));

        let mut second = Cursor::new(b"new\n".to_vec());
        assert_eq!(bytes(reader.next_line_from(3, &mut second)), Some(b"new\n".to_vec()));
    }

    #[cfg(unix)]
    #[test]
    fn test_os_descriptors() -> anyhow::Result<()> {
        use std::io::Write;
        use std::os::unix::io::AsRawFd;

        let mut left = tempfile::NamedTempFile::new()?;
        left.write_all(b"l1\nl2\n")?;
        left.flush()?;
        let mut right = tempfile::NamedTempFile::new()?;
        right.write_all(b"r1\nr2")?;
        right.flush()?;

        let left_file = std::fs::File::open(left.path())?;
        let right_file = std::fs::File::open(right.path())?;
        let (lfd, rfd) = (left_file.as_raw_fd(), right_file.as_raw_fd());

        let mut reader = LineReader::with_chunk_size(1);
        assert_eq!(bytes(reader.next_line(lfd)), Some(b"l1\n".to_vec()));
        assert_eq!(bytes(reader.next_line(rfd)), Some(b"r1\n".to_vec()));
        assert_eq!(bytes(reader.next_line(rfd)), Some(b"r2".to_vec()));
        assert_eq!(bytes(reader.next_line(lfd)), Some(b"l2\n".to_vec()));
        assert_eq!(reader.try_next_line(lfd), Ok(None));
        assert_eq!(reader.try_next_line(rfd), Ok(None));
        assert_eq!(reader.try_next_line(-1), Err(LineReaderError::InvalidDescriptor(-1)));

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_closed_descriptor_yields_nothing() {
        let mut reader = LineReader::default();
        // Far above any descriptor the test harness has open.
        assert!(reader.next_line(1_000_000).is_none());
        assert!(reader.is_drained(1_000_000));
    }
}
