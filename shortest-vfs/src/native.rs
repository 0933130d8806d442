//! Native file system implementation

use crate::error::{VfsError, VfsResult};
use crate::VirtualFileSystem;
use std::path::Path;

/// A native OS file system implementation.
///
/// This wraps `std::fs` operations and provides the `VirtualFileSystem`
/// interface for local file access.
#[derive(Debug, Clone, Default)]
pub struct NativeFileSystem;

impl NativeFileSystem {
    /// Create a new native file system.
    pub fn new() -> Self {
        Self
    }
}

impl VirtualFileSystem for NativeFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| VfsError::from_io(e, path))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        std::fs::write(path, content).map_err(|e| VfsError::from_io(e, path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> VfsResult<()> {
        std::fs::create_dir_all(path).map_err(|e| VfsError::from_io(e, path))
    }

    fn remove_file(&self, path: &Path) -> VfsResult<()> {
        std::fs::remove_file(path).map_err(|e| VfsError::from_io(e, path))
    }

    fn rename(&self, from: &Path, to: &Path) -> VfsResult<()> {
        std::fs::rename(from, to).map_err(|e| VfsError::from_io(e, from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_exists() {
        let fs = NativeFileSystem::new();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("exists.txt");

        assert!(!fs.exists(&file));
        std::fs::write(&file, b"test").unwrap();
        assert!(fs.exists(&file));
    }

    #[test]
    fn test_native_read_write() {
        let fs = NativeFileSystem::new();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("rw.txt");

        fs.write_file(&file, b"hello native").unwrap();

        let content = fs.read_file(&file).unwrap();
        assert_eq!(content, b"hello native");
    }

    #[test]
    fn test_native_overwrite() {
        let fs = NativeFileSystem::new();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("overwrite.txt");

        fs.write_file(&file, b"first").unwrap();
        fs.write_file(&file, b"second").unwrap();

        assert_eq!(fs.read_to_string(&file).unwrap(), "second");
    }

    #[test]
    fn test_native_is_file_and_dir() {
        let fs = NativeFileSystem::new();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs.write_file(&file, b"x").unwrap();

        assert!(fs.is_file(&file));
        assert!(!fs.is_dir(&file));
        assert!(fs.is_dir(dir.path()));
        assert!(!fs.is_file(dir.path()));
    }

    #[test]
    fn test_native_create_dir_all_is_idempotent() {
        let fs = NativeFileSystem::new();
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("c");

        fs.create_dir_all(&nested).unwrap();
        fs.create_dir_all(&nested).unwrap();
        assert!(fs.is_dir(&nested));
    }

    #[test]
    fn test_native_rename_replaces_target() {
        let fs = NativeFileSystem::new();
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("from.json");
        let to = dir.path().join("to.json");

        fs.write_file(&to, b"old").unwrap();
        fs.write_file(&from, b"new").unwrap();
        fs.rename(&from, &to).unwrap();

        assert!(!fs.exists(&from));
        assert_eq!(fs.read_file(&to).unwrap(), b"new");
    }

    #[test]
    fn test_native_read_nonexistent() {
        let fs = NativeFileSystem::new();
        let dir = tempfile::tempdir().unwrap();

        let result = fs.read_file(&dir.path().join("missing"));
        assert!(matches!(result.unwrap_err(), VfsError::NotFound { .. }));
    }

    #[test]
    fn test_native_remove_file() {
        let fs = NativeFileSystem::new();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gone.txt");

        fs.write_file(&file, b"x").unwrap();
        fs.remove_file(&file).unwrap();
        assert!(!fs.exists(&file));
        assert!(matches!(
            fs.remove_file(&file).unwrap_err(),
            VfsError::NotFound { .. }
        ));
    }
}
