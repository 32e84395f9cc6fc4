//! Mount helpers for each backend kind.
//!
//! These wrap [`Namespace::add`] for the common cases: mapping one real file,
//! mapping a whole real directory tree, exposing the members of an archive, and
//! adding generated content.

use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::{ArchiveEntry, MemoryFile, OsFile};
use crate::error::{VfsError, VfsResult};
use crate::hash::EntryId;
use crate::namespace::Namespace;
use crate::path;

impl Namespace {
    /// Map a real file to `target`.
    pub fn add_os_file(&mut self, source: impl Into<PathBuf>, target: &str) -> VfsResult<EntryId> {
        self.add(target, OsFile::new(source))
    }

    /// Add generated content at `target`.
    pub fn add_memory(&mut self, target: &str, data: impl Into<Vec<u8>>) -> VfsResult<EntryId> {
        self.add(target, MemoryFile::new(data))
    }

    /// Mount every file under the real directory `source` beneath `target`.
    ///
    /// Empty real directories are created explicitly; others appear as their
    /// files are added. Symlinks are skipped. Returns the number of files
    /// added.
    #[tracing::instrument(level = "debug", skip(self, source), fields(real_dir = %source.as_ref().display()))]
    pub fn mount_os_dir(
        &mut self,
        source: impl AsRef<Path>,
        target: &str,
        read_only: bool,
    ) -> VfsResult<usize> {
        let source = source.as_ref();
        if !fs::metadata(source)?.is_dir() {
            return Err(VfsError::NotADirectory(source.display().to_string()));
        }

        let mut added = 0;
        let mut pending = vec![(source.to_path_buf(), path::normalize(target)?)];
        while let Some((dir, virtual_dir)) = pending.pop() {
            let mut children = fs::read_dir(&dir)?.collect::<Result<Vec<_>, _>>()?;
            children.sort_by_key(|entry| entry.file_name());

            if children.is_empty() && !path::is_root(&virtual_dir) {
                self.create_directory(&virtual_dir)?;
            }

            for child in children {
                let name = child.file_name().to_string_lossy().into_owned();
                let virtual_path = path::join(&virtual_dir, &name)?;
                let file_type = child.file_type()?;
                if file_type.is_dir() {
                    pending.push((child.path(), virtual_path));
                } else if file_type.is_file() {
                    let backend = if read_only {
                        OsFile::read_only(child.path())
                    } else {
                        OsFile::new(child.path())
                    };
                    self.add(&virtual_path, backend)?;
                    added += 1;
                } else {
                    tracing::trace!(path = %child.path().display(), "skipping non-regular file");
                }
            }
        }

        tracing::debug!(added, "mounted directory");
        Ok(added)
    }

    /// Expose each regular-file member of a tar / tar.gz archive beneath
    /// `target`. Returns the number of members added.
    ///
    /// Members whose names climb out with `..` or name the archive root are
    /// skipped with a warning.
    #[tracing::instrument(level = "debug", skip(self, archive), fields(archive_path = %archive.as_ref().display()))]
    pub fn mount_archive(&mut self, archive: impl AsRef<Path>, target: &str) -> VfsResult<usize> {
        let prefix = path::normalize(target)?;
        let mut count = 0;
        for member in ArchiveEntry::scan(archive.as_ref())? {
            let Some(relative) = contained_member(member.member()) else {
                tracing::warn!(member = member.member(), "skipping archive member outside mount prefix");
                continue;
            };
            let virtual_path = path::join(&prefix, &relative)?;
            self.add(&virtual_path, member)?;
            count += 1;
        }
        tracing::debug!(count, "mounted archive");
        Ok(count)
    }
}

/// Normalize an archive member name on its own, refusing `..` components and
/// names that reduce to the root.
fn contained_member(member: &str) -> Option<String> {
    if member.split(['/', '\\']).any(|component| component == "..") {
        return None;
    }
    path::normalize(member).ok().filter(|p| !path::is_root(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::WriteMode;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_add_os_file() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.txt");
        fs::write(&real, "on disk").unwrap();

        let mut ns = Namespace::new();
        ns.add_os_file(&real, "/mnt/file.txt").unwrap();
        assert_eq!(ns.read_file_as_text("/mnt/file.txt").unwrap(), "on disk");

        ns.write_file("/mnt/file.txt", b" and more", WriteMode::Append)
            .unwrap();
        assert_eq!(fs::read_to_string(&real).unwrap(), "on disk and more");
    }

    #[test]
    fn test_mount_os_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        fs::create_dir_all(dir.path().join("empty")).unwrap();
        fs::write(dir.path().join("README"), "readme").unwrap();
        fs::write(dir.path().join("src/lib.rs"), "lib").unwrap();
        fs::write(dir.path().join("src/nested/mod.rs"), "mod").unwrap();

        let mut ns = Namespace::new();
        let added = ns.mount_os_dir(dir.path(), "/project", true).unwrap();
        assert_eq!(added, 3);

        assert!(ns.directory_exists("/project/empty"));
        assert!(ns.directory_exists("/project/src/nested"));
        assert_eq!(ns.read_file("/project/src/nested/mod.rs").unwrap(), b"mod");
        assert!(matches!(
            ns.write_file("/project/README", b"x", WriteMode::Overwrite),
            Err(VfsError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_mount_os_dir_requires_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, "x").unwrap();

        let mut ns = Namespace::new();
        assert!(matches!(
            ns.mount_os_dir(&file, "/m", false),
            Err(VfsError::NotADirectory(_))
        ));
        assert!(matches!(
            ns.mount_os_dir(dir.path().join("missing"), "/m", false),
            Err(VfsError::NotFound(_))
        ));
    }

    #[test]
    fn test_mount_archive() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("assets.tar");
        let mut builder = tar::Builder::new(fs::File::create(&archive).unwrap());
        for (name, data) in [("textures/grass.png", &b"png"[..]), ("shaders/lit.glsl", &b"glsl"[..])] {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_entry_type(tar::EntryType::Regular);
            header.set_cksum();
            builder.append_data(&mut header, name, data).unwrap();
        }
        builder.into_inner().unwrap().flush().unwrap();

        let mut ns = Namespace::new();
        assert_eq!(ns.mount_archive(&archive, "/assets").unwrap(), 2);
        assert!(ns.directory_exists("/assets/textures"));
        assert_eq!(ns.read_file("/assets/shaders/lit.glsl").unwrap(), b"glsl");
        assert!(matches!(
            ns.write_file("/assets/textures/grass.png", b"x", WriteMode::Overwrite),
            Err(VfsError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_mount_archive_stays_under_prefix() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("pack.tar");
        let mut builder = tar::Builder::new(fs::File::create(&archive).unwrap());
        // Raw header names: the builder's path setters refuse `..`.
        for (name, data) in [
            ("../escaped.txt", &b"out"[..]),
            ("a/../../up.txt", &b"up"[..]),
            ("sub/../sibling.txt", &b"dot"[..]),
            (".", &b"root"[..]),
            ("ok.txt", &b"ok"[..]),
        ] {
            let mut header = tar::Header::new_gnu();
            let raw = &mut header.as_gnu_mut().unwrap().name;
            raw[..name.len()].copy_from_slice(name.as_bytes());
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_entry_type(tar::EntryType::Regular);
            header.set_cksum();
            builder.append(&header, data).unwrap();
        }
        builder.into_inner().unwrap().flush().unwrap();

        let mut ns = Namespace::new();
        ns.create_directory("/assets").unwrap();
        assert_eq!(ns.mount_archive(&archive, "/assets/pack").unwrap(), 1);

        assert!(!ns.file_exists("/assets/escaped.txt"));
        assert!(!ns.file_exists("/up.txt"));
        assert!(!ns.file_exists("/assets/pack/sibling.txt"));
        assert_eq!(ns.read_file("/assets/pack/ok.txt").unwrap(), b"ok");

        let mut paths: Vec<_> = ns.entries().map(|h| h.path().unwrap()).collect();
        paths.sort();
        assert_eq!(paths, vec!["/assets", "/assets/pack", "/assets/pack/ok.txt"]);
    }

    #[test]
    fn test_add_memory() {
        let mut ns = Namespace::new();
        ns.add_memory("/gen/out.txt", "generated").unwrap();
        assert_eq!(ns.read_file_as_text("/gen/out.txt").unwrap(), "generated");
    }
}
