//! Module loader trait and types
//!
//! A module loader imports a compiled module into the host runtime and hands
//! back its exports. Any error thrown by the module's top-level code is
//! reported as [`ImportError::Initialization`].

use crate::component::Component;
use crate::error::ImportError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shortest_vfs::VfsError;
use std::path::{Path, PathBuf};

/// Build a `file://` URL for an absolute path.
///
/// Every byte outside the unreserved set, `/` and `:` is percent-encoded.
/// Paths that are not valid UTF-8 are rejected rather than lossily converted.
pub fn file_url(path: &Path) -> Result<String, VfsError> {
    let text = path.to_str().ok_or_else(|| VfsError::InvalidPath {
        path: path.to_string_lossy().into_owned(),
        reason: "not valid UTF-8".to_string(),
    })?;
    let text = text.replace('\\', "/");

    let mut url = String::from("file://");
    if !text.starts_with('/') {
        url.push('/');
    }
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' | b':' => {
                url.push(byte as char)
            }
            other => url.push_str(&format!("%{:02X}", other)),
        }
    }
    Ok(url)
}

/// A request to import one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    /// `file://` URL of the module
    pub url: String,
    /// Directory the host runtime resolves bare imports from
    pub working_dir: Option<PathBuf>,
}

impl ImportRequest {
    pub fn for_path(path: &Path) -> Result<Self, VfsError> {
        Ok(Self {
            url: file_url(path)?,
            working_dir: None,
        })
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// The namespace of an imported module: its named exports plus `default`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleObject {
    url: String,
    exports: Map<String, Value>,
}

impl ModuleObject {
    pub fn new(url: impl Into<String>, exports: Map<String, Value>) -> Self {
        Self {
            url: url.into(),
            exports,
        }
    }

    /// URL the module was imported from
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.exports.get(name)
    }

    /// The `default` export, if the module has one
    pub fn default_export(&self) -> Option<&Value> {
        self.get("default")
    }

    pub fn export_names(&self) -> impl Iterator<Item = &str> {
        self.exports.keys().map(String::as_str)
    }

    pub fn exports(&self) -> &Map<String, Value> {
        &self.exports
    }

    /// Deserialize one export into a typed value
    pub fn export_as<T: DeserializeOwned>(&self, name: &str) -> Option<serde_json::Result<T>> {
        self.get(name).map(|v| serde_json::from_value(v.clone()))
    }

    pub fn into_exports(self) -> Map<String, Value> {
        self.exports
    }
}

/// The ModuleLoader trait
pub trait ModuleLoader: Component {
    /// Import the module and wait for its initialisation to finish
    fn import(&self, request: &ImportRequest) -> Result<ModuleObject, ImportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_url() {
        assert_eq!(
            file_url(Path::new("/tmp/shortest-cache/config-1.mjs")).unwrap(),
            "file:///tmp/shortest-cache/config-1.mjs"
        );
        assert_eq!(
            file_url(Path::new("/tmp/my dir/a#1.mjs")).unwrap(),
            "file:///tmp/my%20dir/a%231.mjs"
        );
    }

    #[test]
    fn test_file_url_encodes_reserved_and_unicode() {
        assert_eq!(
            file_url(Path::new("/tmp/[x]&y?/100%/é.mjs")).unwrap(),
            "file:///tmp/%5Bx%5D%26y%3F/100%25/%C3%A9.mjs"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_file_url_rejects_non_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"/tmp/bad\xff.mjs"));
        let err = file_url(path).unwrap_err();
        assert!(matches!(err, VfsError::InvalidPath { .. }));
        assert!(ImportRequest::for_path(path).is_err());
    }

    #[test]
    fn test_import_request() {
        let request = ImportRequest::for_path(Path::new("/c/config.mjs"))
            .unwrap()
            .with_working_dir("/repo");
        assert_eq!(request.url, "file:///c/config.mjs");
        assert_eq!(request.working_dir, Some(PathBuf::from("/repo")));
    }

    #[test]
    fn test_module_object_accessors() {
        let mut exports = Map::new();
        exports.insert("default".to_string(), json!({ "key": "value" }));
        exports.insert("retries".to_string(), json!(3));
        let module = ModuleObject::new("file:///c.mjs", exports);

        assert_eq!(module.url(), "file:///c.mjs");
        assert_eq!(module.default_export().unwrap()["key"], "value");
        assert_eq!(module.export_as::<u32>("retries").unwrap().unwrap(), 3);
        assert!(module.export_as::<u32>("missing").is_none());
        assert_eq!(module.export_names().count(), 2);
    }
}
