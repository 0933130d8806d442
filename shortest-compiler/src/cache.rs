//! Cache directory manager
//!
//! One well-known scratch directory per process holds every compiled
//! artifact. It is created on demand and never cleaned up here: compiled test
//! files must outlive the call that produced them.

use crate::error::CompilerError;
use once_cell::sync::Lazy;
use shortest_config::{paths, PipelineConfig};
use shortest_vfs::VirtualFileSystem;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the package descriptor inside the cache directory
pub const DESCRIPTOR_FILE: &str = "package.json";

static SYSTEM_TEMP_ROOT: Lazy<PathBuf> = Lazy::new(std::env::temp_dir);

/// The scratch directory compiled artifacts are written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDir {
    path: PathBuf,
}

impl CacheDir {
    /// Where the cache directory lives for `config`, without creating it
    pub fn location(config: &PipelineConfig) -> Result<PathBuf, CompilerError> {
        let root = config
            .temp_root
            .clone()
            .unwrap_or_else(|| SYSTEM_TEMP_ROOT.clone());
        let root = if root.is_absolute() {
            root
        } else {
            let cwd = std::env::current_dir().map_err(shortest_vfs::VfsError::from)?;
            paths::resolve(&cwd, &root)
        };
        Ok(root.join(&config.cache_dir_name))
    }

    /// Make sure the cache directory exists and return it.
    ///
    /// Idempotent; a file-system failure is fatal and not retried.
    pub fn ensure(fs: &dyn VirtualFileSystem, config: &PipelineConfig) -> Result<Self, CompilerError> {
        let path = Self::location(config)?;
        if fs.is_dir(&path) {
            debug!(target: "shortest::cache", path = %path.display(), "cache directory present");
        } else {
            fs.create_dir_all(&path)?;
            debug!(target: "shortest::cache", path = %path.display(), "cache directory created");
        }
        Ok(Self { path })
    }

    /// Absolute path of the directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file inside the cache directory
    pub fn join(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.path.join(file_name)
    }

    /// Path of the shared package descriptor
    pub fn descriptor_path(&self) -> PathBuf {
        self.join(DESCRIPTOR_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortest_vfs::MemoryFileSystem;

    fn config_at(root: &str) -> PipelineConfig {
        PipelineConfig {
            temp_root: Some(PathBuf::from(root)),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_location_uses_tool_scoped_name() {
        let location = CacheDir::location(&config_at("/scratch")).unwrap();
        assert_eq!(location, PathBuf::from("/scratch/shortest-cache"));
    }

    #[test]
    fn test_location_defaults_to_system_temp() {
        let location = CacheDir::location(&PipelineConfig::default()).unwrap();
        assert!(location.is_absolute());
        assert!(location.ends_with("shortest-cache"));
    }

    #[test]
    fn test_ensure_creates_and_is_idempotent() {
        let fs = MemoryFileSystem::new();
        let config = config_at("/scratch");

        let first = CacheDir::ensure(&fs, &config).unwrap();
        assert!(fs.is_dir(first.path()));

        let second = CacheDir::ensure(&fs, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ensure_propagates_io_failure() {
        let fs = MemoryFileSystem::new();
        fs.set_read_only(true);

        let err = CacheDir::ensure(&fs, &config_at("/scratch")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Io);
    }

    #[test]
    fn test_descriptor_path() {
        let fs = MemoryFileSystem::new();
        let cache = CacheDir::ensure(&fs, &config_at("/scratch")).unwrap();
        assert_eq!(
            cache.descriptor_path(),
            PathBuf::from("/scratch/shortest-cache/package.json")
        );
    }
}
