use std::borrow::Cow;
use std::fmt;

/// One line handed to the caller.
///
/// Holds the raw bytes including the trailing `\n` when the source had one.
/// The last line of a stream without a final newline carries no terminator.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Line(Vec<u8>);

impl Line {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Raw bytes, terminator included
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take ownership of the raw bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Whether the line ends with `\n`
    pub fn is_terminated(&self) -> bool {
        self.0.last() == Some(&b'\n')
    }

    /// Bytes without the trailing `\n`
    pub fn content(&self) -> &[u8] {
        match self.0.split_last() {
            Some((b'\n', rest)) => rest,
            _ => &self.0,
        }
    }

    /// Number of bytes, terminator included
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for lines produced by a reader
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lossy UTF-8 view, terminator included
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({:?})", self.to_string_lossy())
    }
}

impl AsRef<[u8]> for Line {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Line> for Vec<u8> {
    fn from(line: Line) -> Self {
        line.0
    }
}

impl PartialEq<[u8]> for Line {
    fn eq(&self, other: &[u8]) -> bool {
        self.0 == other
    }
}

impl PartialEq<&[u8]> for Line {
    fn eq(&self, other: &&[u8]) -> bool {
        self.0 == *other
    }
}

impl PartialEq<&str> for Line {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}
