//! 测试辅助工具
//!
//! In-memory stand-ins for the bundler and the module loader, so the
//! pipeline can be exercised without esbuild or node installed.

#![allow(dead_code)]

use serde_json::{Map, Value};
use shortest_compiler::shortest_config::{BuildOptions, OutputMode, PipelineConfig};
use shortest_compiler::{
    BuildOutput, BundleError, Bundler, Component, ComponentKind, ComponentMetadata, ImportError,
    ImportRequest, ModuleLoader, ModuleObject, OutputFile, Pipeline,
};
use shortest_vfs::{MemoryFileSystem, VirtualFileSystem};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const REPO: &str = "/repo";
pub const TEMP_ROOT: &str = "/scratch";
pub const RUNTIME_ENTRY: &str = "/repo/packages/shortest/src/index.ts";

/// Bundler that copies the entry source behind the banner.
///
/// Unbalanced braces are reported the way a real bundler reports a syntax
/// error; a missing entry is reported as an unresolved import.
#[derive(Debug, Default)]
pub struct FakeBundler {
    fs: MemoryFileSystem,
    builds: Mutex<Vec<BuildOptions>>,
}

impl FakeBundler {
    pub fn new(fs: MemoryFileSystem) -> Self {
        Self {
            fs,
            builds: Mutex::new(Vec::new()),
        }
    }

    /// Every build request seen so far
    pub fn builds(&self) -> Vec<BuildOptions> {
        self.builds.lock().unwrap().clone()
    }
}

impl Component for FakeBundler {
    fn metadata(&self) -> ComponentMetadata {
        ComponentMetadata::new("fake-bundler", "0.1.0", ComponentKind::Bundler, None)
    }
}

impl Bundler for FakeBundler {
    fn build(&self, options: &BuildOptions) -> Result<BuildOutput, BundleError> {
        self.builds.lock().unwrap().push(options.clone());

        let entry = &options.entry_points[0];
        let source = self.fs.read_to_string(entry).map_err(|_| BundleError::Rejected {
            diagnostics: format!("✘ [ERROR] Could not resolve \"{}\"", entry.display()),
        })?;

        let opens = source.matches('{').count();
        let closes = source.matches('}').count();
        if opens != closes {
            return Err(BundleError::Rejected {
                diagnostics: format!(
                    "✘ [ERROR] Expected \"}}\" but found end of file\n\n    {}:1:0",
                    entry.display()
                ),
            });
        }

        let code = format!("{}\n{}", options.options.banner(), source);
        match &options.output {
            OutputMode::Disk(path) => {
                self.fs.write_file(path, code.as_bytes())?;
                Ok(BuildOutput::default())
            }
            OutputMode::Memory => Ok(BuildOutput {
                output_files: vec![OutputFile::new(None, code)],
                warnings: Vec::new(),
            }),
        }
    }
}

/// Module loader that evaluates `export default <json>;` and
/// `export const NAME = <json>;` lines.
///
/// A module containing `throw new Error("...")` fails to initialise with
/// that message.
#[derive(Debug, Default)]
pub struct FakeLoader {
    fs: MemoryFileSystem,
    imports: Mutex<Vec<ImportRequest>>,
}

impl FakeLoader {
    pub fn new(fs: MemoryFileSystem) -> Self {
        Self {
            fs,
            imports: Mutex::new(Vec::new()),
        }
    }

    pub fn imports(&self) -> Vec<ImportRequest> {
        self.imports.lock().unwrap().clone()
    }
}

impl Component for FakeLoader {
    fn metadata(&self) -> ComponentMetadata {
        ComponentMetadata::new("fake-loader", "0.1.0", ComponentKind::ModuleLoader, None)
    }
}

impl ModuleLoader for FakeLoader {
    fn import(&self, request: &ImportRequest) -> Result<ModuleObject, ImportError> {
        self.imports.lock().unwrap().push(request.clone());

        let path = url_to_path(&request.url);
        let code = self
            .fs
            .read_to_string(&path)
            .map_err(|e| ImportError::Initialization {
                url: request.url.clone(),
                message: format!("Cannot find module '{}': {}", request.url, e),
            })?;

        if let Some(start) = code.find("throw new Error(\"") {
            let rest = &code[start + "throw new Error(\"".len()..];
            let message = rest.split('"').next().unwrap_or_default();
            return Err(ImportError::Initialization {
                url: request.url.clone(),
                message: format!("Error: {}", message),
            });
        }

        let mut exports = Map::new();
        for line in code.lines() {
            let line = line.trim();
            let (name, json) = if let Some(rest) = line.strip_prefix("export default ") {
                ("default".to_string(), rest)
            } else if let Some(rest) = line.strip_prefix("export const ") {
                match rest.split_once(" = ") {
                    Some((name, json)) => (name.to_string(), json),
                    None => continue,
                }
            } else {
                continue;
            };
            let value: Value = serde_json::from_str(json.trim_end_matches(';'))
                .map_err(|e| ImportError::MalformedExports(e.to_string()))?;
            exports.insert(name, value);
        }
        Ok(ModuleObject::new(request.url.clone(), exports))
    }
}

fn url_to_path(url: &str) -> PathBuf {
    let encoded = url.trim_start_matches("file://").as_bytes();
    let mut bytes = Vec::with_capacity(encoded.len());
    let mut i = 0;
    while i < encoded.len() {
        let decoded = (encoded[i] == b'%')
            .then(|| encoded.get(i + 1..i + 3))
            .flatten()
            .and_then(|hex| std::str::from_utf8(hex).ok())
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match decoded {
            Some(byte) => {
                bytes.push(byte);
                i += 3;
            }
            None => {
                bytes.push(encoded[i]);
                i += 1;
            }
        }
    }
    PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
}

/// A pipeline wired to the fakes over one shared in-memory tree
pub struct Harness {
    pub fs: MemoryFileSystem,
    pub bundler: Arc<FakeBundler>,
    pub loader: Arc<FakeLoader>,
    pub pipeline: Pipeline,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_files(Vec::<(&str, &str)>::new())
    }

    /// Harness whose tree already holds the runtime entry plus `files`
    pub fn with_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut all: Vec<(String, Vec<u8>)> = vec![(
            RUNTIME_ENTRY.to_string(),
            b"export const test = () => {};".to_vec(),
        )];
        all.extend(
            files
                .into_iter()
                .map(|(path, text)| (path.to_string(), text.as_bytes().to_vec())),
        );
        let fs = MemoryFileSystem::with_files(all);

        let bundler = Arc::new(FakeBundler::new(fs.clone()));
        let loader = Arc::new(FakeLoader::new(fs.clone()));
        let pipeline = Pipeline::with_components(
            test_config(),
            Arc::new(fs.clone()),
            bundler.clone(),
            loader.clone(),
        )
        .expect("pipeline construction failed");

        Self {
            fs,
            bundler,
            loader,
            pipeline,
        }
    }

    pub fn write(&self, path: &str, text: &str) {
        self.fs.write_file(Path::new(path), text.as_bytes()).unwrap();
    }

    pub fn read(&self, path: &Path) -> String {
        self.fs.read_to_string(path).unwrap()
    }

    /// Files currently inside the cache directory
    pub fn cache_files(&self) -> Vec<String> {
        let prefix = format!("{}/", self.pipeline.cache_dir().path().display());
        self.fs
            .file_paths()
            .into_iter()
            .filter_map(|p| p.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }
}

pub fn test_config() -> PipelineConfig {
    PipelineConfig {
        temp_root: Some(PathBuf::from(TEMP_ROOT)),
        ..PipelineConfig::default()
    }
}

pub fn repo() -> &'static Path {
    Path::new(REPO)
}
