//! Lexical path helpers
//!
//! Resolution here never touches the file system: `..` and `.` are folded
//! the same way a JavaScript `path.resolve` would fold them.

use std::path::{Component, Path, PathBuf};

/// Resolve `path` against `base` and normalise the result.
///
/// An absolute `path` ignores `base`.
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Fold `.` and `..` components without consulting the file system
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` above the root stays at the root
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
