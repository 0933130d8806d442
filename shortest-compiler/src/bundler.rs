//! Bundler trait and types
//!
//! A bundler statically follows the imports of an entry module and emits one
//! self-contained artifact, either written to disk or handed back in memory.

use crate::component::Component;
use crate::error::BundleError;
use shortest_config::{BuildOptions, OutputMode};
use std::path::PathBuf;

/// One file emitted by the bundler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Where the bundler would have written the file, if it knows
    pub path: Option<PathBuf>,
    /// The emitted code
    pub text: String,
}

impl OutputFile {
    pub fn new(path: Option<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path,
            text: text.into(),
        }
    }

    /// Whether this output is a source map rather than code
    pub fn is_source_map(&self) -> bool {
        self.path
            .as_ref()
            .and_then(|p| p.extension())
            .is_some_and(|ext| ext == "map")
    }
}

/// Result of one bundler invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutput {
    /// Files returned in memory (empty when everything went to disk)
    pub output_files: Vec<OutputFile>,
    /// Non-fatal diagnostics
    pub warnings: Vec<String>,
}

impl BuildOutput {
    /// The first emitted code artifact, skipping source maps
    pub fn first_text(&self) -> Option<&str> {
        self.output_files
            .iter()
            .find(|f| !f.is_source_map())
            .map(|f| f.text.as_str())
    }

    /// Interpret this output according to the requested output mode
    pub fn into_artifact(self, mode: &OutputMode) -> Result<CompiledArtifact, BundleError> {
        match mode {
            OutputMode::Disk(path) => Ok(CompiledArtifact::Disk(path.clone())),
            OutputMode::Memory => self
                .first_text()
                .map(|text| CompiledArtifact::Memory(text.to_string()))
                .ok_or(BundleError::NoOutput),
        }
    }
}

/// A compiled module, on disk or in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledArtifact {
    Disk(PathBuf),
    Memory(String),
}

/// The Bundler trait
///
/// Implementors compile `options.entry_points` honouring the external list,
/// alias table and banner carried in [`BuildOptions`].
pub trait Bundler: Component {
    /// Run one build
    ///
    /// In [`OutputMode::Disk`] mode the artifact must be completely written
    /// when this returns `Ok`.
    fn build(&self, options: &BuildOptions) -> Result<BuildOutput, BundleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_skips_source_maps() {
        let output = BuildOutput {
            output_files: vec![
                OutputFile::new(Some(PathBuf::from("<stdout>.map")), "{}"),
                OutputFile::new(Some(PathBuf::from("<stdout>")), "export default 1;"),
            ],
            warnings: vec![],
        };
        assert_eq!(output.first_text(), Some("export default 1;"));
    }

    #[test]
    fn test_memory_artifact_requires_output() {
        let err = BuildOutput::default()
            .into_artifact(&OutputMode::Memory)
            .unwrap_err();
        assert!(matches!(err, BundleError::NoOutput));
    }

    #[test]
    fn test_disk_artifact_is_the_requested_path() {
        let mode = OutputMode::Disk(PathBuf::from("/cache/a.mjs"));
        let artifact = BuildOutput::default().into_artifact(&mode).unwrap();
        assert_eq!(artifact, CompiledArtifact::Disk(PathBuf::from("/cache/a.mjs")));
    }
}
