//! Shortest Config - Pure configuration data structures
//!
//! This crate contains only data structures, no IO or global state.
//! It serves as the shared configuration vocabulary across all Shortest crates:
//! the default bundler option template, the per-call overlay, the alias table
//! and the package descriptor written next to compiled artifacts.

mod alias;
mod options;
pub mod paths;

pub use alias::{AliasTable, PackageDescriptor};
pub use options::{
    BuildOptions, CompileOptions, CompileOverrides, ModuleFormat, OutputMode, Platform,
    NODE_BUILTINS, SHIM_BANNER,
};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the compile-and-load pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// The tool's own package name, redirected to the runtime entry
    pub package_name: String,
    /// Runtime entry module, relative to the working directory of each call
    pub runtime_entry: PathBuf,
    /// Name of the scratch directory created under the temp root
    pub cache_dir_name: String,
    /// Overrides the system temp directory as the cache root
    pub temp_root: Option<PathBuf>,
    /// Extension of dialect source files
    pub source_extension: String,
    /// Extension of compiled, host-executable modules
    pub output_extension: String,
    /// Stem of the temp file that compiled configuration modules are spilled to
    pub config_file_stem: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            package_name: "shortest".to_string(),
            runtime_entry: PathBuf::from("packages/shortest/src/index.ts"),
            cache_dir_name: "shortest-cache".to_string(),
            temp_root: None,
            source_extension: ".ts".to_string(),
            output_extension: ".mjs".to_string(),
            config_file_stem: "config".to_string(),
        }
    }
}

impl PipelineConfig {
    /// The default bundler option template for this configuration
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::for_package(&self.package_name)
    }

    /// Parse a JSON settings document, filling missing fields with defaults
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Pipeline stage enum for stage-specific log filtering
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Cache,
    Bundler,
    Loader,
    Pipeline,
    Config,
}

impl Stage {
    /// All stages, in dependency order
    pub const ALL: [Stage; 5] = [
        Stage::Cache,
        Stage::Bundler,
        Stage::Loader,
        Stage::Pipeline,
        Stage::Config,
    ];

    /// Get the string name of the stage
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Cache => "cache",
            Stage::Bundler => "bundler",
            Stage::Loader => "loader",
            Stage::Pipeline => "pipeline",
            Stage::Config => "config",
        }
    }

    /// Get the log target name for this stage
    pub fn target(&self) -> String {
        format!("shortest::{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline_config() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.package_name, "shortest");
        assert_eq!(cfg.cache_dir_name, "shortest-cache");
        assert_eq!(cfg.source_extension, ".ts");
        assert_eq!(cfg.output_extension, ".mjs");
        assert!(cfg.temp_root.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = PipelineConfig::from_json(r#"{ "packageName": "acme", "tempRoot": "/scratch" }"#)
            .unwrap();
        assert_eq!(cfg.package_name, "acme");
        assert_eq!(cfg.temp_root, Some(PathBuf::from("/scratch")));
        assert_eq!(cfg.runtime_entry, PathBuf::from("packages/shortest/src/index.ts"));
    }

    #[test]
    fn test_compile_options_follow_package_name() {
        let cfg = PipelineConfig {
            package_name: "acme".to_string(),
            ..PipelineConfig::default()
        };
        assert!(cfg.compile_options().external().iter().any(|e| e == "acme"));
    }

    #[test]
    fn test_stage_target() {
        assert_eq!(Stage::Cache.as_str(), "cache");
        assert_eq!(Stage::Pipeline.target(), "shortest::pipeline");
        assert_eq!(Stage::ALL.len(), 5);
    }
}
