use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::constants::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
use crate::error::{LineReaderError, LineResult};

/// Reader settings.
///
/// Can be loaded from JSON; missing fields fall back to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Number of bytes requested per underlying read
    pub chunk_size: usize,
    /// When set, descriptors must lie in `[0, descriptor_limit)`
    pub descriptor_limit: Option<i32>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            descriptor_limit: None,
        }
    }
}

impl ReaderConfig {
    /// Default settings with a custom chunk size
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            ..Self::default()
        }
    }

    /// Check the chunk size against `(0, MAX_CHUNK_SIZE]`
    pub fn validate(&self) -> LineResult<()> {
        validate_chunk_size(self.chunk_size)
    }

    /// Check a descriptor number against the sign and the optional limit
    pub fn check_descriptor(&self, fd: i32) -> LineResult<()> {
        if fd < 0 {
            return Err(LineReaderError::InvalidDescriptor(fd));
        }
        match self.descriptor_limit {
            Some(limit) if fd >= limit => Err(LineReaderError::InvalidDescriptor(fd)),
            _ => Ok(()),
        }
    }

    /// Load settings from a JSON file and validate them
    pub fn load<P: AsRef<Path>>(path: P) -> LineResult<Self> {
        let file = File::open(path.as_ref())?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn validate_chunk_size(chunk_size: usize) -> LineResult<()> {
    if chunk_size == 0 || chunk_size > MAX_CHUNK_SIZE {
        return Err(LineReaderError::InvalidConfiguration {
            chunk_size,
            max: MAX_CHUNK_SIZE,
        });
    }
    Ok(())
}
