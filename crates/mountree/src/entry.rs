//! Namespace entries.

use crate::backend::Backend;
use crate::hash::EntryId;

/// Kind of namespace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Variant payload of an entry.
#[derive(Debug, Clone)]
pub enum EntryData {
    /// File content lives in the backend.
    File(Backend),
    /// Child ids in insertion order, no duplicates.
    Directory(Vec<EntryId>),
}

/// A node in the namespace. Owned exclusively by [`crate::Namespace`].
#[derive(Debug, Clone)]
pub struct Entry {
    /// Final path component.
    pub(crate) name: String,
    /// Containing directory; `None` directly under the implicit root.
    pub(crate) parent: Option<EntryId>,
    pub(crate) data: EntryData,
}

impl Entry {
    pub(crate) fn file(name: impl Into<String>, backend: Backend) -> Self {
        Self {
            name: name.into(),
            parent: None,
            data: EntryData::File(backend),
        }
    }

    pub(crate) fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            data: EntryData::Directory(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<EntryId> {
        self.parent
    }

    pub fn kind(&self) -> EntryKind {
        match self.data {
            EntryData::File(_) => EntryKind::File,
            EntryData::Directory(_) => EntryKind::Directory,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind() == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind() == EntryKind::File
    }

    /// The backend of a file entry.
    pub fn backend(&self) -> Option<&Backend> {
        match &self.data {
            EntryData::File(backend) => Some(backend),
            EntryData::Directory(_) => None,
        }
    }

    /// The child ids of a directory entry.
    pub fn children(&self) -> Option<&[EntryId]> {
        match &self.data {
            EntryData::Directory(children) => Some(children),
            EntryData::File(_) => None,
        }
    }
}
