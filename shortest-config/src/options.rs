//! Bundler option template and the per-call overlay

use crate::alias::AliasTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Host built-in modules that are never inlined into a bundle
pub const NODE_BUILTINS: [&str; 12] = [
    "fs",
    "path",
    "os",
    "util",
    "events",
    "stream",
    "assert",
    "url",
    "crypto",
    "buffer",
    "querystring",
    "fsevents",
];

/// Shims prepended to every compiled module so CommonJS idioms keep working
/// inside an ES module.
pub const SHIM_BANNER: &str = "\
import { fileURLToPath } from 'url';
import { dirname } from 'path';
import { createRequire } from 'module';

const __filename = fileURLToPath(import.meta.url);
const __dirname = dirname(__filename);
const require = createRequire(import.meta.url);
";

/// Module format of the emitted code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    Esm,
    Cjs,
    Iife,
}

impl ModuleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleFormat::Esm => "esm",
            ModuleFormat::Cjs => "cjs",
            ModuleFormat::Iife => "iife",
        }
    }
}

/// Platform the emitted code runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Node,
    Browser,
    Neutral,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Node => "node",
            Platform::Browser => "browser",
            Platform::Neutral => "neutral",
        }
    }
}

/// Where the bundler puts its result
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Write a single file to the given path
    Disk(PathBuf),
    /// Return the emitted code to the caller
    #[default]
    Memory,
}

impl OutputMode {
    pub fn is_memory(&self) -> bool {
        matches!(self, OutputMode::Memory)
    }

    /// Output path for disk mode
    pub fn path(&self) -> Option<&Path> {
        match self {
            OutputMode::Disk(path) => Some(path),
            OutputMode::Memory => None,
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Disk(path) => write!(f, "disk({})", path.display()),
            OutputMode::Memory => write!(f, "memory"),
        }
    }
}

/// The immutable default template handed to the bundler.
///
/// Built once with [`CompileOptions::for_package`]; the external list always
/// carries the host built-ins plus the tool's own package name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    format: ModuleFormat,
    platform: Platform,
    target: String,
    bundle: bool,
    sourcemap: bool,
    external: Vec<String>,
    banner: String,
    resolve_extensions: Vec<String>,
}

impl CompileOptions {
    /// Default template for a tool whose runtime is published as `package_name`
    pub fn for_package(package_name: &str) -> Self {
        let mut external = vec![package_name.to_string()];
        external.extend(NODE_BUILTINS.iter().map(|m| m.to_string()));
        Self {
            format: ModuleFormat::Esm,
            platform: Platform::Node,
            target: "node18".to_string(),
            bundle: true,
            sourcemap: true,
            external: dedup(external),
            banner: SHIM_BANNER.to_string(),
            resolve_extensions: vec![".ts".to_string(), ".js".to_string(), ".mjs".to_string()],
        }
    }

    pub fn format(&self) -> ModuleFormat {
        self.format
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn bundle(&self) -> bool {
        self.bundle
    }

    pub fn sourcemap(&self) -> bool {
        self.sourcemap
    }

    pub fn external(&self) -> &[String] {
        &self.external
    }

    pub fn banner(&self) -> &str {
        &self.banner
    }

    pub fn resolve_extensions(&self) -> &[String] {
        &self.resolve_extensions
    }

    /// Specialise the template for one bundler call.
    ///
    /// Only the fields of [`CompileOverrides`] can change; the template itself
    /// is left untouched.
    pub fn overlay(&self, overrides: CompileOverrides) -> BuildOptions {
        let mut options = self.clone();
        if !overrides.additional_external.is_empty() {
            options.external.extend(overrides.additional_external);
            options.external = dedup(std::mem::take(&mut options.external));
        }
        BuildOptions {
            options,
            entry_points: overrides.entry_points,
            output: overrides.output,
            alias: overrides.alias,
            working_dir: overrides.working_dir,
        }
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::for_package("shortest")
    }
}

/// The enumerated fields a single call may override
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOverrides {
    pub entry_points: Vec<PathBuf>,
    pub output: OutputMode,
    pub alias: AliasTable,
    pub additional_external: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl CompileOverrides {
    /// Overrides for a single entry point
    pub fn entry(path: impl Into<PathBuf>) -> Self {
        Self {
            entry_points: vec![path.into()],
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn with_alias(mut self, alias: AliasTable) -> Self {
        self.alias = alias;
        self
    }

    pub fn with_external(mut self, name: impl Into<String>) -> Self {
        self.additional_external.push(name.into());
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Fully resolved options for one bundler invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub options: CompileOptions,
    pub entry_points: Vec<PathBuf>,
    pub output: OutputMode,
    pub alias: AliasTable,
    pub working_dir: Option<PathBuf>,
}

fn dedup(names: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}
