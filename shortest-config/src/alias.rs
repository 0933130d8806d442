//! Alias table and package descriptor

use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Compile-time redirection of import names to concrete files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, PathBuf>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `package_name` to `runtime_entry` resolved against `working_dir`.
    ///
    /// Nothing is cached: the working directory may differ between calls.
    pub fn resolve(package_name: &str, runtime_entry: &Path, working_dir: &Path) -> Self {
        let mut table = Self::new();
        table.insert(package_name, paths::resolve(working_dir, runtime_entry));
        table
    }

    pub fn insert(&mut self, name: impl Into<String>, target: impl Into<PathBuf>) {
        self.entries.insert(name.into(), target.into());
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }
}

/// Package descriptor written into the cache directory.
///
/// Serialises as `{"type":"module","imports":{...}}` so module resolution of
/// nested imports can still find the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    pub imports: BTreeMap<String, String>,
}

impl PackageDescriptor {
    pub fn for_alias(alias: &AliasTable) -> Self {
        Self {
            kind: "module".to_string(),
            imports: alias
                .iter()
                .map(|(name, target)| (name.to_string(), target.to_string_lossy().into_owned()))
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
