//! Error types for namespace and backend operations.

use thiserror::Error;

/// Result type for namespace operations.
pub type VfsResult<T> = Result<T, VfsError>;

/// Namespace operation errors.
///
/// All variants are usage errors raised synchronously; none are transient and
/// nothing in this crate retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VfsError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid path: {0:?}")]
    InvalidPath(String),
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error("buffer too small: {available} bytes given, {needed} needed")]
    BufferTooSmall { needed: usize, available: usize },
    #[error("not a directory: {0}")]
    NotADirectory(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("io error: {0}")]
    Io(String),
}

impl VfsError {
    pub(crate) fn read_only(what: impl std::fmt::Display) -> Self {
        VfsError::UnsupportedOperation(format!("{what} is read-only"))
    }
}

impl From<std::io::Error> for VfsError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::NotFound => VfsError::NotFound(err.to_string()),
            ErrorKind::PermissionDenied | ErrorKind::ReadOnlyFilesystem => {
                VfsError::UnsupportedOperation(err.to_string())
            }
            ErrorKind::InvalidInput => VfsError::InvalidPath(err.to_string()),
            _ => VfsError::Io(err.to_string()),
        }
    }
}
