//! esbuild Bundler - 调用 esbuild 可执行文件

use crate::bundler::{BuildOutput, Bundler, OutputFile};
use crate::component::{Component, ComponentKind, ComponentMetadata};
use crate::error::BundleError;
use shortest_config::{BuildOptions, OutputMode};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Environment variable that points at a specific esbuild executable
pub const ESBUILD_BINARY_ENV: &str = "ESBUILD_BINARY_PATH";

/// Bundler backed by the `esbuild` command line
#[derive(Debug, Clone)]
pub struct EsbuildBundler {
    program: PathBuf,
}

impl EsbuildBundler {
    /// Use `$ESBUILD_BINARY_PATH`, or `esbuild` from `PATH`
    pub fn new() -> Self {
        let program = std::env::var_os(ESBUILD_BINARY_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("esbuild"));
        Self { program }
    }

    /// Use a specific executable
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    /// Command line arguments for one build
    pub fn args(build: &BuildOptions) -> Vec<String> {
        let options = &build.options;
        let mut args: Vec<String> = build
            .entry_points
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();

        if options.bundle() {
            args.push("--bundle".to_string());
        }
        args.push(format!("--format={}", options.format().as_str()));
        args.push(format!("--platform={}", options.platform().as_str()));
        args.push(format!("--target={}", options.target()));

        if options.sourcemap() {
            // stdout has no companion file, so the map has to travel inline
            match build.output {
                OutputMode::Disk(_) => args.push("--sourcemap".to_string()),
                OutputMode::Memory => args.push("--sourcemap=inline".to_string()),
            }
        }

        for name in options.external() {
            args.push(format!("--external:{}", name));
        }
        for (name, target) in build.alias.iter() {
            args.push(format!("--alias:{}={}", name, target.display()));
        }
        if !options.banner().is_empty() {
            args.push(format!("--banner:js={}", options.banner()));
        }
        if !options.resolve_extensions().is_empty() {
            args.push(format!(
                "--resolve-extensions={}",
                options.resolve_extensions().join(",")
            ));
        }
        if let OutputMode::Disk(path) = &build.output {
            args.push(format!("--outfile={}", path.display()));
        }
        args.push("--log-level=warning".to_string());
        args
    }
}

impl Default for EsbuildBundler {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for EsbuildBundler {
    fn metadata(&self) -> ComponentMetadata {
        ComponentMetadata::new(
            "esbuild",
            "0.1.0",
            ComponentKind::Bundler,
            Some("调用 esbuild 可执行文件进行打包"),
        )
    }
}

impl Bundler for EsbuildBundler {
    fn build(&self, options: &BuildOptions) -> Result<BuildOutput, BundleError> {
        let args = Self::args(options);
        debug!(
            target: "shortest::bundler",
            program = %self.program.display(),
            output = %options.output,
            "running esbuild"
        );

        let mut command = Command::new(&self.program);
        command.args(&args).stdin(Stdio::null());
        if let Some(dir) = &options.working_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| BundleError::Launch {
            program: self.program.display().to_string(),
            source,
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            let diagnostics = if stderr.is_empty() {
                format!("esbuild exited with {}", output.status)
            } else {
                stderr
            };
            return Err(BundleError::Rejected { diagnostics });
        }

        let mut warnings = Vec::new();
        if !stderr.is_empty() {
            warn!(target: "shortest::bundler", "{}", stderr);
            warnings.push(stderr);
        }

        let output_files = match options.output {
            OutputMode::Disk(_) => Vec::new(),
            OutputMode::Memory => {
                let text = String::from_utf8(output.stdout).map_err(|_| BundleError::InvalidOutput)?;
                vec![OutputFile::new(None, text)]
            }
        };

        Ok(BuildOutput {
            output_files,
            warnings,
        })
    }
}
