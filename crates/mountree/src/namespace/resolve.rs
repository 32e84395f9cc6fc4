//! Path reconstruction and enumeration.
//!
//! Enumerators and handles borrow the namespace immutably, so nothing can be
//! added while one is alive. They still resolve lazily: a handle looks its
//! entry up again on every call instead of copying anything out of it.

use std::collections::hash_map;
use std::slice;

use super::Namespace;
use crate::backend::{Backend, FileBackend};
use crate::entry::{Entry, EntryData, EntryKind};
use crate::error::{VfsError, VfsResult};
use crate::hash::{EntryId, hash};
use crate::path::{self, SEPARATOR};

impl Namespace {
    /// Rebuild the normalized path of an entry from its parent links.
    pub fn get_path(&self, id: EntryId) -> VfsResult<String> {
        let mut entry = self
            .entries
            .get(&id)
            .ok_or_else(|| VfsError::NotFound(id.to_string()))?;
        let mut names = vec![entry.name.as_str()];

        while let Some(parent) = entry.parent {
            let Some(next) = self.entries.get(&parent) else {
                break;
            };
            if names.len() > self.entries.len() {
                return Err(VfsError::Io(format!("parent chain of {id} loops")));
            }
            names.push(next.name.as_str());
            entry = next;
        }

        let mut path = String::new();
        for name in names.iter().rev() {
            path.push(SEPARATOR);
            path.push_str(name);
        }
        Ok(path)
    }

    /// Every entry in the namespace, in unspecified order.
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            namespace: self,
            inner: self.entries.iter(),
        }
    }

    /// The children of the directory at `path`, in insertion order.
    ///
    /// `/` lists the entries directly under the implicit root.
    pub fn entries_in_directory(&self, path: &str) -> VfsResult<DirEntries<'_>> {
        let normalized = path::normalize(path)?;
        let ids = if path::is_root(&normalized) {
            &self.root
        } else {
            match self.entries.get(&hash(&normalized)).map(|e| &e.data) {
                Some(EntryData::Directory(children)) => children,
                Some(EntryData::File(_)) => return Err(VfsError::NotADirectory(normalized)),
                None => return Err(VfsError::NotFound(normalized)),
            }
        };
        Ok(DirEntries {
            namespace: self,
            ids: ids.iter(),
        })
    }

    /// A handle for the entry at `path`.
    pub fn handle(&self, path: &str) -> VfsResult<Handle<'_>> {
        let id = self.resolve(path)?;
        Handle::new(self, id).ok_or_else(|| VfsError::NotFound(path.to_string()))
    }
}

/// Lightweight view of one entry: an id plus a borrow of the namespace.
#[derive(Debug, Clone, Copy)]
pub struct Handle<'ns> {
    id: EntryId,
    kind: EntryKind,
    namespace: &'ns Namespace,
}

impl<'ns> Handle<'ns> {
    fn new(namespace: &'ns Namespace, id: EntryId) -> Option<Self> {
        let kind = namespace.entries.get(&id)?.kind();
        Some(Self {
            id,
            kind,
            namespace,
        })
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn entry(&self) -> VfsResult<&'ns Entry> {
        self.namespace
            .entries
            .get(&self.id)
            .ok_or_else(|| VfsError::NotFound(self.id.to_string()))
    }

    /// Final path component.
    pub fn name(&self) -> VfsResult<&'ns str> {
        Ok(self.entry()?.name())
    }

    /// Full normalized path.
    pub fn path(&self) -> VfsResult<String> {
        self.namespace.get_path(self.id)
    }

    pub fn read(&self) -> VfsResult<Vec<u8>> {
        self.backend()?.read_all()
    }

    pub fn read_into(&self, buffer: &mut [u8], offset: usize, length: usize) -> VfsResult<usize> {
        self.backend()?.read_into(buffer, offset, length)
    }

    pub fn read_as_text(&self) -> VfsResult<String> {
        self.backend()?.read_as_text()
    }

    /// Content size for files, child count for directories.
    pub fn size(&self) -> VfsResult<u64> {
        let entry = self.entry()?;
        match &entry.data {
            EntryData::File(backend) => backend.size(),
            EntryData::Directory(children) => Ok(children.len() as u64),
        }
    }

    /// Children of a directory handle.
    pub fn children(&self) -> VfsResult<DirEntries<'ns>> {
        match &self.entry()?.data {
            EntryData::Directory(children) => Ok(DirEntries {
                namespace: self.namespace,
                ids: children.iter(),
            }),
            EntryData::File(_) => Err(VfsError::NotADirectory(self.path()?)),
        }
    }

    fn backend(&self) -> VfsResult<&'ns Backend> {
        let entry = self.entry()?;
        entry.backend().ok_or_else(|| {
            VfsError::UnsupportedOperation(format!("is a directory: {}", entry.name()))
        })
    }
}

/// Iterator over every entry of a namespace.
#[derive(Debug)]
pub struct Entries<'ns> {
    namespace: &'ns Namespace,
    inner: hash_map::Iter<'ns, EntryId, Entry>,
}

impl<'ns> Iterator for Entries<'ns> {
    type Item = Handle<'ns>;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, entry) = self.inner.next()?;
        Some(Handle {
            id: *id,
            kind: entry.kind(),
            namespace: self.namespace,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_> {}

/// Iterator over the children of one directory.
#[derive(Debug)]
pub struct DirEntries<'ns> {
    namespace: &'ns Namespace,
    ids: slice::Iter<'ns, EntryId>,
}

impl<'ns> Iterator for DirEntries<'ns> {
    type Item = Handle<'ns>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = *self.ids.next()?;
            if let Some(handle) = Handle::new(self.namespace, id) {
                return Some(handle);
            }
        }
    }
}
