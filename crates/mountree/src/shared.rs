//! Coarse-locked namespace for use across threads.
//!
//! Directory linking touches two entries at once, so the whole namespace sits
//! behind one `RwLock`: many readers or a single writer.

use std::sync::{Arc, RwLock};

use crate::error::{VfsError, VfsResult};
use crate::namespace::Namespace;

/// A cloneable, thread-safe handle to one [`Namespace`].
#[derive(Debug, Clone, Default)]
pub struct SharedNamespace {
    inner: Arc<RwLock<Namespace>>,
}

impl SharedNamespace {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            inner: Arc::new(RwLock::new(namespace)),
        }
    }

    /// Run `f` with shared access. Enumerations started inside `f` see no
    /// concurrent mutation.
    pub fn read<R>(&self, f: impl FnOnce(&Namespace) -> R) -> VfsResult<R> {
        let guard = self
            .inner
            .read()
            .map_err(|_| VfsError::Io("lock poisoned".to_string()))?;
        Ok(f(&guard))
    }

    /// Run `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut Namespace) -> R) -> VfsResult<R> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| VfsError::Io("lock poisoned".to_string()))?;
        Ok(f(&mut guard))
    }
}

impl From<Namespace> for SharedNamespace {
    fn from(namespace: Namespace) -> Self {
        Self::new(namespace)
    }
}
