//! Shared constants for the line reader

/// Chunk size used when none is configured.
/// Overridable at build time through the `GNL_CHUNK_SIZE` environment variable.
pub const DEFAULT_CHUNK_SIZE: usize = match option_env!("GNL_CHUNK_SIZE") {
    Some(raw) => parse_chunk_size(raw),
    None => 1024,
};

/// Largest accepted chunk size. Anything at or above the 32-bit signed bound is rejected.
pub const MAX_CHUNK_SIZE: usize = i32::MAX as usize - 1;

/// Initial capacity of a session's pending buffer
pub const INITIAL_PENDING_CAPACITY: usize = 1024;

/// Parse a decimal chunk size at compile time, falling back to 1024 on anything malformed
const fn parse_chunk_size(raw: &str) -> usize {
    let bytes = raw.as_bytes();
    if bytes.is_empty() {
        return 1024;
    }
    let mut value: usize = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            return 1024;
        }
        value = match value.checked_mul(10) {
            Some(v) => match v.checked_add((b - b'0') as usize) {
                Some(v) => v,
                None => return 1024,
            },
            None => return 1024,
        };
        i += 1;
    }
    value
}
