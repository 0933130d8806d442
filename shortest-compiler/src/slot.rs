//! Per-call scratch slot tokens
//!
//! Every compile or load call gets its own token so that overlapping calls
//! never share a temp file name.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Issues unique slot tokens for one pipeline
#[derive(Debug, Default)]
pub struct SlotIssuer {
    next: AtomicU64,
}

impl SlotIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for a call working on `source`
    pub fn issue(&self, source: &Path) -> SlotToken {
        let counter = self.next.fetch_add(1, Ordering::Relaxed);
        let mut hasher = DefaultHasher::new();
        source.hash(&mut hasher);
        SlotToken(format!(
            "{:x}-{:x}-{:08x}",
            std::process::id(),
            counter,
            hasher.finish() as u32
        ))
    }
}

/// A unique, file-name safe identifier for one in-flight call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotToken(String);

impl SlotToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<stem>-<token><extension>`
    pub fn file_name(&self, stem: &str, extension: &str) -> String {
        format!("{}-{}{}", stem, self.0, extension)
    }
}

impl fmt::Display for SlotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
