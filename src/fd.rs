use std::io::{self, Read};
use std::os::unix::io::RawFd;

/// Non-owning reader over a raw descriptor number.
///
/// Reads go straight to `read(2)`; dropping the value never closes the
/// descriptor. An invalid or closed descriptor simply makes every read fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDescriptor(RawFd);

impl RawDescriptor {
    /// Wrap a descriptor number without taking ownership
    pub fn new(fd: RawFd) -> Self {
        Self(fd)
    }

    /// The wrapped descriptor number
    pub fn raw(&self) -> RawFd {
        self.0
    }
}

impl Read for RawDescriptor {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // SAFETY: `buf` is valid for writes of `buf.len()` bytes for the
        // duration of the call; the kernel validates the descriptor.
        let n = unsafe { libc::read(self.0, buf.as_mut_ptr().cast(), buf.len()) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(n as usize)
    }
}
