//! In-memory file system implementation

use crate::error::{VfsError, VfsResult};
use crate::VirtualFileSystem;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Tree {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
}

/// An in-memory file system implementation.
///
/// Files and directories live in a shared tree, so clones observe each
/// other's writes. Suitable for testing the pipeline without touching disk.
///
/// # Example
/// ```
/// use shortest_vfs::{MemoryFileSystem, VirtualFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new();
/// fs.write_file(Path::new("/test.txt"), b"hello").unwrap();
/// let content = fs.read_file(Path::new("/test.txt")).unwrap();
/// assert_eq!(content, b"hello");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    tree: Arc<RwLock<Tree>>,
    read_only: Arc<AtomicBool>,
}

impl MemoryFileSystem {
    /// Create a new empty memory file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new memory file system pre-populated with files.
    ///
    /// # Arguments
    /// * `files` - Iterator of (path, content) tuples
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: AsRef<str>,
    {
        let fs = Self::new();
        {
            let mut tree = fs.tree.write().unwrap_or_else(|e| e.into_inner());
            for (path, content) in files {
                tree.files.insert(normalize_path(Path::new(path.as_ref())), content);
            }
        }
        fs
    }

    /// Make every mutating operation fail with `PermissionDenied`
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Paths of all files, sorted
    pub fn file_paths(&self) -> Vec<String> {
        match self.tree.read() {
            Ok(tree) => tree.files.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn check_writable(&self, path: &Path) -> VfsResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(VfsError::PermissionDenied {
                path: normalize_path(path),
            });
        }
        Ok(())
    }

    fn lock_poisoned() -> VfsError {
        VfsError::Io {
            message: "Lock poisoned".to_string(),
        }
    }
}

/// Normalize a path string for internal storage.
/// Uses forward slashes consistently and drops a trailing separator.
fn normalize_path(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    if text.len() > 1 && text.ends_with('/') {
        text.trim_end_matches('/').to_string()
    } else {
        text
    }
}

impl VirtualFileSystem for MemoryFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let normalized = normalize_path(path);
        let tree = self.tree.read().map_err(|_| Self::lock_poisoned())?;

        tree.files
            .get(&normalized)
            .cloned()
            .ok_or(VfsError::NotFound { path: normalized })
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        self.check_writable(path)?;
        let normalized = normalize_path(path);
        let mut tree = self.tree.write().map_err(|_| Self::lock_poisoned())?;
        if tree.dirs.contains(&normalized) {
            return Err(VfsError::InvalidPath {
                path: normalized,
                reason: "is a directory".to_string(),
            });
        }
        tree.files.insert(normalized, content.to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        let normalized = normalize_path(path);
        match self.tree.read() {
            Ok(tree) => tree.files.contains_key(&normalized),
            Err(_) => false,
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        let normalized = normalize_path(path);
        let tree = match self.tree.read() {
            Ok(guard) => guard,
            Err(_) => return false,
        };
        if tree.dirs.contains(&normalized) {
            return true;
        }
        // Parents of stored files count as directories
        let prefix = if normalized.ends_with('/') {
            normalized
        } else {
            format!("{}/", normalized)
        };
        tree.files.keys().any(|k| k.starts_with(&prefix))
    }

    fn create_dir_all(&self, path: &Path) -> VfsResult<()> {
        self.check_writable(path)?;
        let mut tree = self.tree.write().map_err(|_| Self::lock_poisoned())?;
        let mut current = Some(path);
        while let Some(dir) = current {
            let normalized = normalize_path(dir);
            if normalized.is_empty() {
                break;
            }
            if tree.files.contains_key(&normalized) {
                return Err(VfsError::AlreadyExists { path: normalized });
            }
            tree.dirs.insert(normalized);
            current = dir.parent();
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> VfsResult<()> {
        self.check_writable(path)?;
        let normalized = normalize_path(path);
        let mut tree = self.tree.write().map_err(|_| Self::lock_poisoned())?;
        tree.files
            .remove(&normalized)
            .map(|_| ())
            .ok_or(VfsError::NotFound { path: normalized })
    }

    fn rename(&self, from: &Path, to: &Path) -> VfsResult<()> {
        self.check_writable(to)?;
        let from = normalize_path(from);
        let to = normalize_path(to);
        let mut tree = self.tree.write().map_err(|_| Self::lock_poisoned())?;
        let content = tree
            .files
            .remove(&from)
            .ok_or(VfsError::NotFound { path: from })?;
        tree.files.insert(to, content);
        Ok(())
    }
}
