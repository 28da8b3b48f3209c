//! Lexical path handling.
//!
//! Nothing in here touches the filesystem: symlinks are preserved, `..` is
//! folded purely on the path text.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Lexically clean a path.
///
/// Collapses `.` segments and duplicate separators, and folds `..` into the
/// preceding segment. `..` directly under the root of an absolute path is
/// dropped; leading `..` of a relative path is kept. An empty result is `.`.
///
/// # Example
/// ```ignore
/// assert_eq!(clean("/data/./sub//../file.txt"), PathBuf::from("/data/file.txt"));
/// ```
pub fn clean(path: impl AsRef<Path>) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().map(|c| c.as_os_str()).collect()
}

/// Make a path absolute against the working directory, then clean it.
///
/// Falls back to cleaning the path as given if the working directory is
/// unavailable.
pub fn absolute_clean(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    match std::path::absolute(path) {
        Ok(abs) => clean(abs),
        Err(_) => clean(path),
    }
}

/// Replace the host separator with `/`.
pub fn to_slash(s: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        s.to_string()
    } else {
        s.replace(MAIN_SEPARATOR, "/")
    }
}

/// Number of leading bytes to strip from paths discovered under `root` so
/// that names come out relative to it.
///
/// The root counts with a trailing separator: `/data` and `/data/` both give 6.
pub fn prefix_len(root: impl AsRef<Path>) -> usize {
    let root = root.as_ref().to_string_lossy();
    if root.ends_with(MAIN_SEPARATOR) || root.ends_with('/') {
        root.len()
    } else {
        root.len() + MAIN_SEPARATOR.len_utf8()
    }
}
