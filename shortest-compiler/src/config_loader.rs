//! Tool configuration discovery
//!
//! Users write `shortest.config.ts` in the same dialect as their tests. The
//! file is compiled and imported through [`Pipeline::load_module`] and its
//! default export becomes the configuration.

use crate::error::CompilerError;
use crate::pipeline::Pipeline;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shortest_config::paths;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File names probed, in order
pub const CONFIG_CANDIDATES: [&str; 3] = [
    "shortest.config.ts",
    "shortest.config.js",
    "shortest.config.mjs",
];

/// Error type for configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No config file found. Create one of: {}", .searched.join(", "))]
    NotFound { searched: Vec<String> },

    #[error("Config file {path} has no default export")]
    NoDefaultExport { path: String },

    #[error("Invalid config in {path}: {message}")]
    Invalid { path: String, message: String },

    #[error(transparent)]
    Load(#[from] CompilerError),
}

impl ConfigError {
    /// User-facing error code
    pub fn code(&self) -> String {
        match self {
            ConfigError::NotFound { .. } => "file-not-found".to_string(),
            ConfigError::NoDefaultExport { .. } => "no-default-export".to_string(),
            ConfigError::Invalid { .. } => "invalid-config".to_string(),
            ConfigError::Load(e) => e.code(),
        }
    }
}

/// Finds and loads the tool's own configuration file
#[derive(Debug)]
pub struct ConfigLoader<'a> {
    pipeline: &'a Pipeline,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(pipeline: &'a Pipeline) -> Self {
        Self { pipeline }
    }

    /// First candidate that exists under `cwd`
    pub fn discover(&self, cwd: &Path) -> Result<PathBuf, ConfigError> {
        CONFIG_CANDIDATES
            .iter()
            .map(|name| paths::resolve(cwd, Path::new(name)))
            .find(|path| self.pipeline.fs().is_file(path))
            .ok_or_else(|| ConfigError::NotFound {
                searched: CONFIG_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            })
    }

    /// Discover and load the configuration under `cwd`
    pub fn load(&self, cwd: &Path) -> Result<Value, ConfigError> {
        let path = self.discover(cwd)?;
        self.load_from(&path, cwd)
    }

    /// Load the default export of a specific configuration file
    pub fn load_from(&self, path: &Path, cwd: &Path) -> Result<Value, ConfigError> {
        debug!(target: "shortest::config", path = %path.display(), "loading config");
        let module = self.pipeline.load_module(path, cwd)?;
        module
            .default_export()
            .cloned()
            .ok_or_else(|| ConfigError::NoDefaultExport {
                path: path.display().to_string(),
            })
    }

    /// Discover, load and deserialize the configuration
    pub fn load_as<T: DeserializeOwned>(&self, cwd: &Path) -> Result<T, ConfigError> {
        let path = self.discover(cwd)?;
        let value = self.load_from(&path, cwd)?;
        serde_json::from_value(value).map_err(|e| ConfigError::Invalid {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
