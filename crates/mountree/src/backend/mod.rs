//! File content backends.
//!
//! A file entry never stores its bytes in the namespace; it stores a
//! [`Backend`] that knows where the bytes live:
//!
//! - **OsFile**: a real path on the host filesystem
//! - **ArchiveEntry**: one member of a tar (optionally gzip'd) archive on disk
//! - **MemoryFile**: an owned byte buffer
//!
//! Backends acquire their resources (open files, archive streams) inside a
//! single call and release them before returning. Nothing is held between
//! calls.

mod archive;
mod memory;
mod os;

pub use archive::{ArchiveEntry, ArchiveFormat};
pub use memory::MemoryFile;
pub use os::OsFile;

use crate::error::{VfsError, VfsResult};

/// How a write combines with existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Replace all existing content.
    #[default]
    Overwrite,
    /// Add to the end of existing content.
    Append,
}

/// Byte-level capability contract every backend provides.
pub trait FileBackend {
    /// Read the entire contents.
    fn read_all(&self) -> VfsResult<Vec<u8>>;

    /// Size of the content in bytes.
    fn size(&self) -> VfsResult<u64>;

    /// Returns true if writes always fail.
    fn is_read_only(&self) -> bool;

    /// Write data according to `mode`.
    ///
    /// Returns `UnsupportedOperation` if the backend is read-only.
    fn write(&mut self, data: &[u8], mode: WriteMode) -> VfsResult<()>;

    /// Copy the contents into `buffer[offset..length]`.
    ///
    /// Fails with `BufferTooSmall` when `length - offset` is less than the
    /// content size. Returns the number of bytes copied.
    fn read_into(&self, buffer: &mut [u8], offset: usize, length: usize) -> VfsResult<usize> {
        let data = self.read_all()?;
        copy_into(&data, buffer, offset, length)
    }

    /// Read the contents as UTF-8 text.
    fn read_as_text(&self) -> VfsResult<String> {
        String::from_utf8(self.read_all()?)
            .map_err(|e| VfsError::Io(format!("invalid utf-8: {e}")))
    }

    /// Write UTF-8 text according to `mode`.
    fn write_text(&mut self, text: &str, mode: WriteMode) -> VfsResult<()> {
        self.write(text.as_bytes(), mode)
    }
}

/// Check that `buffer[offset..min(length, buffer.len())]` exists and holds
/// `needed` bytes.
///
/// An offset past the end of the window is rejected even when nothing needs
/// copying, so callers can always slice `buffer[offset..offset + needed]`.
pub(crate) fn check_window(
    buffer_len: usize,
    offset: usize,
    length: usize,
    needed: usize,
) -> VfsResult<()> {
    let end = length.min(buffer_len);
    let available = end.saturating_sub(offset);
    if offset > end || available < needed {
        return Err(VfsError::BufferTooSmall { needed, available });
    }
    Ok(())
}

pub(crate) fn copy_into(
    data: &[u8],
    buffer: &mut [u8],
    offset: usize,
    length: usize,
) -> VfsResult<usize> {
    check_window(buffer.len(), offset, length, data.len())?;
    buffer[offset..offset + data.len()].copy_from_slice(data);
    Ok(data.len())
}

/// The backing store of a file entry.
#[derive(Debug, Clone)]
pub enum Backend {
    Os(OsFile),
    Archive(ArchiveEntry),
    Memory(MemoryFile),
}

impl Backend {
    /// Short label for logs and `stat` output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Backend::Os(_) => "os",
            Backend::Archive(_) => "archive",
            Backend::Memory(_) => "memory",
        }
    }
}

impl FileBackend for Backend {
    fn read_all(&self) -> VfsResult<Vec<u8>> {
        match self {
            Backend::Os(b) => b.read_all(),
            Backend::Archive(b) => b.read_all(),
            Backend::Memory(b) => b.read_all(),
        }
    }

    fn size(&self) -> VfsResult<u64> {
        match self {
            Backend::Os(b) => b.size(),
            Backend::Archive(b) => b.size(),
            Backend::Memory(b) => b.size(),
        }
    }

    fn is_read_only(&self) -> bool {
        match self {
            Backend::Os(b) => b.is_read_only(),
            Backend::Archive(b) => b.is_read_only(),
            Backend::Memory(b) => b.is_read_only(),
        }
    }

    fn write(&mut self, data: &[u8], mode: WriteMode) -> VfsResult<()> {
        match self {
            Backend::Os(b) => b.write(data, mode),
            Backend::Archive(b) => b.write(data, mode),
            Backend::Memory(b) => b.write(data, mode),
        }
    }

    fn read_into(&self, buffer: &mut [u8], offset: usize, length: usize) -> VfsResult<usize> {
        match self {
            Backend::Os(b) => b.read_into(buffer, offset, length),
            Backend::Archive(b) => b.read_into(buffer, offset, length),
            Backend::Memory(b) => b.read_into(buffer, offset, length),
        }
    }
}

impl From<OsFile> for Backend {
    fn from(b: OsFile) -> Self {
        Backend::Os(b)
    }
}

impl From<ArchiveEntry> for Backend {
    fn from(b: ArchiveEntry) -> Self {
        Backend::Archive(b)
    }
}

impl From<MemoryFile> for Backend {
    fn from(b: MemoryFile) -> Self {
        Backend::Memory(b)
    }
}
