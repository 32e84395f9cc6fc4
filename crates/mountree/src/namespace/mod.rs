//! The namespace index.
//!
//! [`Namespace`] owns every entry, keyed by the hash of its normalized path.
//! Everything else (handles, enumerators) refers to entries by id and looks
//! them up again on each access.
//!
//! # Re-adding a path
//!
//! `add` on a path that already holds a file replaces the file in place: the
//! new entry keeps the slot's position in its parent's child list. If the old
//! occupant was listed under a different parent (only possible after a hash
//! collision) it is detached from that list before the new entry is linked.
//! `add` on a path that holds a directory fails with `AlreadyExists`, since
//! replacing it would orphan the directory's children.

mod resolve;
mod tree;

pub use resolve::{DirEntries, Entries, Handle};

use std::collections::HashMap;

use crate::backend::{Backend, FileBackend, WriteMode};
use crate::entry::{Entry, EntryData};
use crate::error::{VfsError, VfsResult};
use crate::hash::{EntryId, hash};
use crate::path;

/// In-memory virtual namespace.
#[derive(Debug, Default)]
pub struct Namespace {
    entries: HashMap<EntryId, Entry>,
    /// Children of the implicit root, in insertion order.
    root: Vec<EntryId>,
}

impl Namespace {
    /// Create an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, directories included. The implicit root is not counted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a file at `path`, creating any missing ancestor directories.
    pub fn add(&mut self, path: &str, backend: impl Into<Backend>) -> VfsResult<EntryId> {
        let normalized = path::normalize(path)?;
        if path::is_root(&normalized) {
            return Err(VfsError::InvalidPath(path.to_string()));
        }
        let (ancestor, leaf) = path::split(&normalized);
        let leaf = leaf.to_string();
        let (parent, _) = self.ensure_directory(ancestor)?;

        let id = hash(&normalized);
        if let Some(existing) = self.entries.get(&id) {
            if existing.is_dir() {
                return Err(VfsError::AlreadyExists(normalized));
            }
            if existing.parent != parent {
                tracing::debug!(%id, path = %normalized, "detaching replaced entry from old parent");
                self.detach(id);
            }
        }

        let backend = backend.into();
        tracing::debug!(%id, path = %normalized, backend = backend.kind_name(), "adding file");
        self.entries.insert(id, Entry::file(leaf, backend));
        self.attach(id, parent);
        Ok(id)
    }

    /// Create a directory at `path`, creating any missing ancestors.
    ///
    /// Succeeds without changes if the directory already exists.
    pub fn create_directory(&mut self, path: &str) -> VfsResult<EntryId> {
        let normalized = path::normalize(path)?;
        if path::is_root(&normalized) {
            return Err(VfsError::InvalidPath(path.to_string()));
        }
        let (id, _) = self.ensure_directory(Some(&normalized))?;
        id.ok_or(VfsError::InvalidPath(normalized))
    }

    /// True if `path` names a file. Never fails; bad paths are simply absent.
    pub fn file_exists(&self, path: &str) -> bool {
        self.lookup(path).is_some_and(|(_, entry)| entry.is_file())
    }

    /// True if `path` names a directory. The root always exists.
    pub fn directory_exists(&self, path: &str) -> bool {
        match path::normalize(path) {
            Ok(normalized) if path::is_root(&normalized) => true,
            Ok(normalized) => self
                .entries
                .get(&hash(&normalized))
                .is_some_and(Entry::is_dir),
            Err(_) => false,
        }
    }

    /// Link `child` into the directory `parent`.
    ///
    /// Moves the child out of any other child list first. Linking an id that
    /// is already listed under `parent` does nothing.
    pub fn link(&mut self, child: EntryId, parent: EntryId) -> VfsResult<()> {
        if !self.entries.contains_key(&child) {
            return Err(VfsError::NotFound(child.to_string()));
        }
        match self.entries.get(&parent) {
            Some(entry) if entry.is_dir() => {}
            Some(entry) => return Err(VfsError::NotADirectory(entry.name.clone())),
            None => return Err(VfsError::NotFound(parent.to_string())),
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(VfsError::UnsupportedOperation(format!(
                "linking {child} under {parent} would create a cycle"
            )));
        }

        let current = self.entries.get(&child).and_then(|e| e.parent);
        if current != Some(parent) {
            self.detach(child);
        }
        self.attach(child, Some(parent));
        Ok(())
    }

    /// Look up an entry by id.
    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(&id)
    }

    /// Resolve a path to its id, failing with `NotFound` if absent.
    pub fn resolve(&self, path: &str) -> VfsResult<EntryId> {
        let normalized = path::normalize(path)?;
        let id = hash(&normalized);
        if self.entries.contains_key(&id) {
            Ok(id)
        } else {
            Err(VfsError::NotFound(normalized))
        }
    }

    /// Read a file's entire contents.
    pub fn read_file(&self, path: &str) -> VfsResult<Vec<u8>> {
        self.file_backend(path)?.read_all()
    }

    /// Read a file into `buffer[offset..length]`, returning the byte count.
    pub fn read_file_into(
        &self,
        path: &str,
        buffer: &mut [u8],
        offset: usize,
        length: usize,
    ) -> VfsResult<usize> {
        self.file_backend(path)?.read_into(buffer, offset, length)
    }

    /// Read a file as UTF-8 text.
    pub fn read_file_as_text(&self, path: &str) -> VfsResult<String> {
        self.file_backend(path)?.read_as_text()
    }

    /// Size of a file's content in bytes.
    pub fn file_size(&self, path: &str) -> VfsResult<u64> {
        self.file_backend(path)?.size()
    }

    /// Write to an existing file through its backend.
    pub fn write_file(&mut self, path: &str, data: &[u8], mode: WriteMode) -> VfsResult<()> {
        self.file_backend_mut(path)?.write(data, mode)
    }

    /// Write UTF-8 text to an existing file through its backend.
    pub fn write_file_text(&mut self, path: &str, text: &str, mode: WriteMode) -> VfsResult<()> {
        self.file_backend_mut(path)?.write_text(text, mode)
    }

    fn lookup(&self, path: &str) -> Option<(EntryId, &Entry)> {
        let normalized = path::normalize(path).ok()?;
        let id = hash(&normalized);
        self.entries.get(&id).map(|entry| (id, entry))
    }

    fn file_backend(&self, path: &str) -> VfsResult<&Backend> {
        let id = self.resolve(path)?;
        match self.entries.get(&id).map(|e| &e.data) {
            Some(EntryData::File(backend)) => Ok(backend),
            Some(EntryData::Directory(_)) => Err(is_a_directory(path)),
            None => Err(VfsError::NotFound(path.to_string())),
        }
    }

    fn file_backend_mut(&mut self, path: &str) -> VfsResult<&mut Backend> {
        let id = self.resolve(path)?;
        match self.entries.get_mut(&id).map(|e| &mut e.data) {
            Some(EntryData::File(backend)) => Ok(backend),
            Some(EntryData::Directory(_)) => Err(is_a_directory(path)),
            None => Err(VfsError::NotFound(path.to_string())),
        }
    }

    /// Set `child.parent` and append it to the parent's (or root's) child
    /// list unless already present. Callers guarantee both ids are valid.
    fn attach(&mut self, child: EntryId, parent: Option<EntryId>) {
        if let Some(entry) = self.entries.get_mut(&child) {
            entry.parent = parent;
        }
        let children = match parent {
            Some(pid) => match self.entries.get_mut(&pid).map(|e| &mut e.data) {
                Some(EntryData::Directory(children)) => children,
                _ => return,
            },
            None => &mut self.root,
        };
        if !children.contains(&child) {
            children.push(child);
        }
    }

    /// Remove `child` from whichever child list currently holds it.
    fn detach(&mut self, child: EntryId) {
        let Some(parent) = self.entries.get(&child).map(|e| e.parent) else {
            return;
        };
        let children = match parent {
            Some(pid) => match self.entries.get_mut(&pid).map(|e| &mut e.data) {
                Some(EntryData::Directory(children)) => children,
                _ => return,
            },
            None => &mut self.root,
        };
        children.retain(|id| *id != child);
    }

    /// True if `ancestor` is `id` or appears on `id`'s parent chain.
    fn is_ancestor_or_self(&self, ancestor: EntryId, id: EntryId) -> bool {
        let mut current = Some(id);
        for _ in 0..=self.entries.len() {
            match current {
                Some(cid) if cid == ancestor => return true,
                Some(cid) => current = self.entries.get(&cid).and_then(|e| e.parent),
                None => return false,
            }
        }
        true
    }
}

fn is_a_directory(path: &str) -> VfsError {
    VfsError::UnsupportedOperation(format!("is a directory: {path}"))
}
