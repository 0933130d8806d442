//! Bundler implementations

mod esbuild;

pub use esbuild::{EsbuildBundler, ESBUILD_BINARY_ENV};
