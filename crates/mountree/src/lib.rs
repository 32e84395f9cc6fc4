//! mountree: an in-memory virtual namespace.
//!
//! Mount heterogeneous content under one path-addressable tree and read,
//! write, or enumerate it without caring where the bytes live:
//!
//! - **OsFile**: a real file on the host filesystem
//! - **ArchiveEntry**: a member of a tar / tar.gz archive (read-only)
//! - **MemoryFile**: an owned in-memory buffer
//!
//! # Design
//!
//! Every entry is stored in a flat map keyed by the SDBM hash of its
//! normalized path. Directories keep an ordered list of child ids and every
//! entry keeps its parent's id, which is enough to rebuild full paths:
//!
//! ```text
//! /                          # implicit root, not an entry
//! ├── /assets/               # Directory, auto-created
//! │   └── /assets/logo.png   # File → ArchiveEntry
//! └── /notes.txt             # File → MemoryFile
//! ```
//!
//! ```
//! use mountree::{MemoryFile, Namespace, WriteMode};
//!
//! let mut ns = Namespace::new();
//! ns.add("/docs/readme.txt", MemoryFile::new("hello")).unwrap();
//! assert!(ns.directory_exists("/docs"));
//!
//! ns.write_file("/docs/readme.txt", b" world", WriteMode::Append).unwrap();
//! assert_eq!(ns.read_file_as_text("/docs/readme.txt").unwrap(), "hello world");
//! ```

pub mod backend;
mod entry;
mod error;
pub mod hash;
mod mount;
mod namespace;
pub mod path;
mod shared;

pub use backend::{
    ArchiveEntry, ArchiveFormat, Backend, FileBackend, MemoryFile, OsFile, WriteMode,
};
pub use entry::{Entry, EntryKind};
pub use error::{VfsError, VfsResult};
pub use hash::{EntryId, hash};
pub use namespace::{DirEntries, Entries, Handle, Namespace};
pub use shared::SharedNamespace;
