//! In-memory file backend.
//!
//! Used for placeholders and generated content. All data is owned by the entry.

use super::{FileBackend, WriteMode};
use crate::error::{VfsError, VfsResult};

/// File content held in an owned buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryFile {
    data: Vec<u8>,
    read_only: bool,
}

impl MemoryFile {
    /// Create a writable in-memory file.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            read_only: false,
        }
    }

    /// Create an in-memory file that rejects writes.
    pub fn read_only(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            read_only: true,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl FileBackend for MemoryFile {
    fn read_all(&self) -> VfsResult<Vec<u8>> {
        Ok(self.data.clone())
    }

    fn size(&self) -> VfsResult<u64> {
        Ok(self.data.len() as u64)
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn write(&mut self, data: &[u8], mode: WriteMode) -> VfsResult<()> {
        if self.read_only {
            return Err(VfsError::read_only("memory file"));
        }
        match mode {
            WriteMode::Overwrite => {
                self.data.clear();
                self.data.extend_from_slice(data);
            }
            WriteMode::Append => self.data.extend_from_slice(data),
        }
        Ok(())
    }

    fn read_into(&self, buffer: &mut [u8], offset: usize, length: usize) -> VfsResult<usize> {
        super::copy_into(&self.data, buffer, offset, length)
    }
}
