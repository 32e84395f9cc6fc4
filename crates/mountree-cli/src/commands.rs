//! Output formatting for the `mountree` subcommands.
//!
//! Every command renders into a `String` (or bytes for `cat`) so the binary
//! only has to print and tests can compare directly.

use mountree::{FileBackend, Handle, Namespace, VfsResult, path};

/// One name per line, directories suffixed with `/`.
///
/// Listing a file prints just its name.
pub fn ls(ns: &Namespace, target: &str) -> VfsResult<String> {
    let normalized = path::normalize(target)?;
    if !path::is_root(&normalized) {
        let handle = ns.handle(&normalized)?;
        if handle.is_file() {
            return Ok(format!("{}\n", handle.name()?));
        }
    }

    let mut out = String::new();
    for child in ns.entries_in_directory(&normalized)? {
        push_name(&mut out, &child)?;
        out.push('\n');
    }
    Ok(out)
}

/// Raw file content.
pub fn cat(ns: &Namespace, target: &str) -> VfsResult<Vec<u8>> {
    ns.read_file(target)
}

/// Render the subtree under `target` with box-drawing connectors.
pub fn tree(ns: &Namespace, target: &str) -> VfsResult<String> {
    let normalized = path::normalize(target)?;
    let top: Vec<Handle<'_>> = if path::is_root(&normalized) {
        ns.entries_in_directory(&normalized)?.collect()
    } else {
        let handle = ns.handle(&normalized)?;
        if handle.is_file() {
            return Ok(format!("{normalized}\n"));
        }
        handle.children()?.collect()
    };

    let mut out = format!("{normalized}\n");

    // (handle, prefix, is_last), pushed in reverse so pops come out in order.
    let mut stack: Vec<(Handle<'_>, String, bool)> = Vec::new();
    push_children(&mut stack, top, "");

    while let Some((handle, prefix, is_last)) = stack.pop() {
        let connector = if is_last { "└── " } else { "├── " };
        out.push_str(&prefix);
        out.push_str(connector);
        push_name(&mut out, &handle)?;
        out.push('\n');

        if handle.is_dir() {
            let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
            push_children(&mut stack, handle.children()?.collect(), &child_prefix);
        }
    }
    Ok(out)
}

fn push_children<'ns>(
    stack: &mut Vec<(Handle<'ns>, String, bool)>,
    children: Vec<Handle<'ns>>,
    prefix: &str,
) {
    let last = children.len().saturating_sub(1);
    for (i, child) in children.into_iter().enumerate().rev() {
        stack.push((child, prefix.to_string(), i == last));
    }
}

fn push_name(out: &mut String, handle: &Handle<'_>) -> VfsResult<()> {
    out.push_str(handle.name()?);
    if handle.is_dir() {
        out.push('/');
    }
    Ok(())
}

/// Key/value description of one entry.
pub fn stat(ns: &Namespace, target: &str) -> VfsResult<String> {
    let handle = ns.handle(target)?;
    let entry = handle.entry()?;

    let mut out = format!("path: {}\nid: {}\n", handle.path()?, handle.id());
    match entry.backend() {
        Some(backend) => out.push_str(&format!(
            "kind: file\nbackend: {}\nsize: {}\nread_only: {}\n",
            backend.kind_name(),
            backend.size()?,
            backend.is_read_only()
        )),
        None => out.push_str(&format!(
            "kind: directory\nchildren: {}\n",
            handle.size()?
        )),
    }
    Ok(out)
}
