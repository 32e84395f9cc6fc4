//! Directory tree construction.
//!
//! Missing ancestors are materialized lazily and top-down: the builder walks
//! up from the requested directory until it meets an existing directory (or
//! the implicit root), remembering each missing level on a stack, then pops
//! the stack creating and linking one empty directory per level.

use super::Namespace;
use crate::entry::Entry;
use crate::error::{VfsError, VfsResult};
use crate::hash::{EntryId, hash};
use crate::path;

impl Namespace {
    /// Ensure every ancestor directory of `path` exists.
    ///
    /// Returns `true` if at least one directory had to be created.
    pub fn ensure_ancestors(&mut self, path: &str) -> VfsResult<bool> {
        let normalized = path::normalize(path)?;
        if path::is_root(&normalized) {
            return Ok(false);
        }
        let (ancestor, _) = path::split(&normalized);
        let (_, created) = self.ensure_directory(ancestor)?;
        Ok(created)
    }

    /// Ensure the normalized directory `dir` exists, creating it and any
    /// missing ancestors. `None` stands for the implicit root.
    ///
    /// Returns the directory's id (`None` for the root) and whether anything
    /// was created.
    pub(crate) fn ensure_directory(
        &mut self,
        dir: Option<&str>,
    ) -> VfsResult<(Option<EntryId>, bool)> {
        let mut missing = Vec::new();
        let mut anchor = None;
        let mut cursor = dir;

        while let Some(current) = cursor {
            let id = hash(current);
            match self.entries.get(&id) {
                Some(entry) if entry.is_dir() => {
                    anchor = Some(id);
                    break;
                }
                Some(_) => return Err(VfsError::NotADirectory(current.to_string())),
                None => {
                    missing.push(current);
                    cursor = path::split(current).0;
                }
            }
        }

        let created = !missing.is_empty();
        let mut parent = anchor;
        while let Some(current) = missing.pop() {
            let id = self.register_directory(current);
            self.attach(id, parent);
            tracing::trace!(%id, path = current, "created directory");
            parent = Some(id);
        }
        Ok((parent, created))
    }

    /// Store an empty directory at the normalized `dir` without touching its
    /// ancestors or linking it anywhere.
    fn register_directory(&mut self, dir: &str) -> EntryId {
        let id = hash(dir);
        let (_, name) = path::split(dir);
        self.entries.insert(id, Entry::directory(name));
        id
    }
}
