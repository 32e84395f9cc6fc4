//! Host filesystem backend.
//!
//! Maps a virtual file onto a real path, with optional read-only mode. The
//! file is opened per call and closed before the call returns.

use super::{FileBackend, WriteMode};
use crate::error::{VfsError, VfsResult};
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// A file entry backed by a real path on disk.
#[derive(Debug, Clone)]
pub struct OsFile {
    path: PathBuf,
    read_only: bool,
}

impl OsFile {
    /// Create a writable backend for the given real path.
    ///
    /// The path is not checked until the first read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_only: false,
        }
    }

    /// Create a read-only backend.
    pub fn read_only(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_only: true,
        }
    }

    /// Set whether this backend is read-only.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// The real path this entry reads from.
    pub fn real_path(&self) -> &Path {
        &self.path
    }

    fn check_writable(&self) -> VfsResult<()> {
        if self.read_only {
            Err(VfsError::read_only(self.path.display()))
        } else {
            Ok(())
        }
    }
}

impl FileBackend for OsFile {
    fn read_all(&self) -> VfsResult<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }

    fn size(&self) -> VfsResult<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn write(&mut self, data: &[u8], mode: WriteMode) -> VfsResult<()> {
        self.check_writable()?;
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            WriteMode::Overwrite => options.write(true).truncate(true),
            WriteMode::Append => options.append(true),
        };
        let mut file = options.open(&self.path)?;
        file.write_all(data)?;
        Ok(())
    }

    fn read_into(&self, buffer: &mut [u8], offset: usize, length: usize) -> VfsResult<usize> {
        let mut file = fs::File::open(&self.path)?;
        let needed = usize::try_from(file.metadata()?.len())
            .map_err(|_| VfsError::Io(format!("file too large: {}", self.path.display())))?;
        super::check_window(buffer.len(), offset, length, needed)?;
        file.read_exact(&mut buffer[offset..offset + needed])?;
        Ok(needed)
    }
}
