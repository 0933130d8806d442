//! Shortest Compiler
//!
//! Compile-and-load pipeline for test and configuration files written in a
//! typed superset of JavaScript.
//!
//! A [`Pipeline`] owns a cache directory and two external capabilities: a
//! [`Bundler`] that turns a source entry into one self-contained ES module,
//! and a [`ModuleLoader`] that imports such a module and reports its exports.

pub mod bundler;
pub mod bundlers;
pub mod cache;
pub mod component;
pub mod config_loader;
pub mod error;
pub mod loaders;
pub mod module_loader;
pub mod pipeline;
pub mod slot;

pub use bundler::{BuildOutput, Bundler, CompiledArtifact, OutputFile};
pub use bundlers::{EsbuildBundler, ESBUILD_BINARY_ENV};
pub use cache::{CacheDir, DESCRIPTOR_FILE};
pub use component::{Component, ComponentKind, ComponentMetadata};
pub use config_loader::{ConfigError, ConfigLoader, CONFIG_CANDIDATES};
pub use error::{BundleError, CompilerError, ErrorKind, ImportError};
pub use loaders::{NodeModuleLoader, EXPORTS_MARKER};
pub use module_loader::{file_url, ImportRequest, ModuleLoader, ModuleObject};
pub use pipeline::Pipeline;
pub use slot::{SlotIssuer, SlotToken};

pub use shortest_config;
