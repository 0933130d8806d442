//! Shortest Virtual File System
//!
//! The file-system capability the compile-and-load pipeline depends on:
//! existence checks, directory creation and whole-file writes with overwrite
//! semantics. Two backends are provided.
//!
//! # Usage
//! ```rust
//! use shortest_vfs::{VirtualFileSystem, MemoryFileSystem};
//! use std::path::Path;
//!
//! let fs = MemoryFileSystem::new();
//! fs.write_file(Path::new("/test.txt"), b"hello").unwrap();
//! let content = fs.read_file(Path::new("/test.txt")).unwrap();
//! assert_eq!(content, b"hello");
//! ```

mod error;
mod memory;
mod native;
mod r#trait;

pub use error::{VfsError, VfsResult};
pub use memory::MemoryFileSystem;
pub use native::NativeFileSystem;
pub use r#trait::VirtualFileSystem;

