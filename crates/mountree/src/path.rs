//! Virtual path normalization.
//!
//! The namespace uses one separator (`/`) and always produces root-prefixed
//! paths. Caller input is normalized exactly once, before hashing:
//!
//! - `\` is treated as a separator and rewritten to `/`
//! - a leading `/` is added when missing
//! - empty and `.` components are dropped, `..` pops the previous component
//! - trailing separators are removed
//!
//! Escaping the root with `..`, an empty string, or an embedded NUL is
//! rejected with [`VfsError::InvalidPath`].

use crate::error::{VfsError, VfsResult};

/// The separator used in every normalized path.
pub const SEPARATOR: char = '/';

/// The normalized path of the implicit root.
pub const ROOT: &str = "/";

/// Normalize a caller-supplied path into its canonical, root-prefixed form.
pub fn normalize(path: &str) -> VfsResult<String> {
    if path.is_empty() || path.contains('\0') {
        return Err(VfsError::InvalidPath(path.to_string()));
    }

    let mut components: Vec<&str> = Vec::new();
    for component in path.split(['/', '\\']) {
        match component {
            "" | "." => {}
            ".." => {
                if components.pop().is_none() {
                    return Err(VfsError::InvalidPath(path.to_string()));
                }
            }
            name => components.push(name),
        }
    }

    let mut normalized = String::with_capacity(path.len() + 1);
    for component in &components {
        normalized.push(SEPARATOR);
        normalized.push_str(component);
    }
    if normalized.is_empty() {
        normalized.push(SEPARATOR);
    }
    Ok(normalized)
}

/// True if a normalized path names the implicit root.
pub fn is_root(normalized: &str) -> bool {
    normalized == ROOT
}

/// Split a normalized, non-root path into `(ancestor, leaf)`.
///
/// The ancestor is `None` when the leaf sits directly under the root.
pub fn split(normalized: &str) -> (Option<&str>, &str) {
    match normalized.rfind(SEPARATOR) {
        Some(0) | None => (None, normalized.trim_start_matches(SEPARATOR)),
        Some(idx) => (Some(&normalized[..idx]), &normalized[idx + 1..]),
    }
}

/// Join a normalized directory path and a relative path, then normalize.
pub fn join(base: &str, relative: &str) -> VfsResult<String> {
    normalize(&format!("{base}{SEPARATOR}{relative}"))
}
