//! VirtualFileSystem trait definition

use crate::error::VfsResult;
use std::path::Path;

/// Virtual File System trait
///
/// Provides a unified interface for file operations, decoupling the pipeline
/// from a specific file system implementation.
///
/// # Implementations
/// - `MemoryFileSystem`: In-memory file system
/// - `NativeFileSystem`: Native OS file system
pub trait VirtualFileSystem: Send + Sync {
    /// Read file contents
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>>;

    /// Write file contents
    ///
    /// Creates the file if it doesn't exist, truncates it if it does.
    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()>;

    /// Check if path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and all missing parents.
    ///
    /// Succeeds when the directory already exists.
    fn create_dir_all(&self, path: &Path) -> VfsResult<()>;

    /// Remove a file
    fn remove_file(&self, path: &Path) -> VfsResult<()>;

    /// Move `from` onto `to`, replacing `to` if it exists
    fn rename(&self, from: &Path, to: &Path) -> VfsResult<()>;

    /// Read a file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> VfsResult<String> {
        let bytes = self.read_file(path)?;
        String::from_utf8(bytes).map_err(|e| crate::VfsError::InvalidPath {
            path: path.to_string_lossy().to_string(),
            reason: format!("not valid UTF-8: {}", e),
        })
    }
}
