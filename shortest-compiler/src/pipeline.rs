//! Compile-and-load pipeline
//!
//! Two request/response operations share one cache directory:
//!
//! - [`Pipeline::compile_file`] bundles a test file to disk so a separate
//!   process can execute it later.
//! - [`Pipeline::load_module`] bundles a configuration file in memory, spills
//!   it to a per-call temp file and imports it right away.

use crate::bundler::{Bundler, CompiledArtifact};
use crate::bundlers::EsbuildBundler;
use crate::cache::CacheDir;
use crate::error::{BundleError, CompilerError};
use crate::loaders::NodeModuleLoader;
use crate::module_loader::{ImportRequest, ModuleLoader, ModuleObject};
use crate::slot::{SlotIssuer, SlotToken};
use shortest_config::{
    paths, AliasTable, CompileOptions, CompileOverrides, OutputMode, PackageDescriptor,
    PipelineConfig,
};
use shortest_vfs::{NativeFileSystem, VfsError, VirtualFileSystem};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The compile-and-load pipeline
pub struct Pipeline {
    config: PipelineConfig,
    options: CompileOptions,
    cache: CacheDir,
    fs: Arc<dyn VirtualFileSystem>,
    bundler: Arc<dyn Bundler>,
    loader: Arc<dyn ModuleLoader>,
    slots: SlotIssuer,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .field("bundler", &self.bundler.name())
            .field("loader", &self.loader.name())
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Pipeline on the native file system, bundling with esbuild and
    /// importing with node
    pub fn new(config: PipelineConfig) -> Result<Self, CompilerError> {
        Self::with_components(
            config,
            Arc::new(NativeFileSystem::new()),
            Arc::new(EsbuildBundler::new()),
            Arc::new(NodeModuleLoader::new()),
        )
    }

    /// Pipeline with explicit capabilities.
    ///
    /// Creates the cache directory if it does not exist yet.
    pub fn with_components(
        config: PipelineConfig,
        fs: Arc<dyn VirtualFileSystem>,
        bundler: Arc<dyn Bundler>,
        loader: Arc<dyn ModuleLoader>,
    ) -> Result<Self, CompilerError> {
        let cache = CacheDir::ensure(fs.as_ref(), &config)?;
        let options = config.compile_options();
        debug!(
            target: "shortest::pipeline",
            cache = %cache.path().display(),
            bundler = bundler.name(),
            loader = loader.name(),
            "pipeline ready"
        );
        Ok(Self {
            config,
            options,
            cache,
            fs,
            bundler,
            loader,
            slots: SlotIssuer::new(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The default option template every call overlays
    pub fn compile_options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn cache_dir(&self) -> &CacheDir {
        &self.cache
    }

    /// The file system every call goes through
    pub fn fs(&self) -> &dyn VirtualFileSystem {
        self.fs.as_ref()
    }

    /// Name of the compiled artifact for `source`: `login.test.ts` becomes
    /// `login.test.mjs`.
    pub fn output_file_name(&self, source: &Path) -> Result<String, CompilerError> {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| VfsError::InvalidPath {
                path: source.display().to_string(),
                reason: "no file name".to_string(),
            })?;

        let source_ext = &self.config.source_extension;
        let output_ext = &self.config.output_extension;
        if let Some(stem) = name.strip_suffix(source_ext.as_str()).filter(|s| !s.is_empty()) {
            return Ok(format!("{}{}", stem, output_ext));
        }
        match Path::new(&name).file_stem() {
            Some(stem) if Path::new(&name).extension().is_some() => {
                Ok(format!("{}{}", stem.to_string_lossy(), output_ext))
            }
            _ => Ok(format!("{}{}", name, output_ext)),
        }
    }

    /// Compile a test file into the cache directory and return the output path.
    ///
    /// Relative paths and the runtime alias resolve against the process
    /// working directory at call time.
    pub fn compile_file(&self, source: impl AsRef<Path>) -> Result<PathBuf, CompilerError> {
        let cwd = current_dir()?;
        self.compile_file_from(source, &cwd)
    }

    /// [`Pipeline::compile_file`] with an explicit working directory
    pub fn compile_file_from(
        &self,
        source: impl AsRef<Path>,
        cwd: &Path,
    ) -> Result<PathBuf, CompilerError> {
        let requested = source.as_ref();
        let entry = paths::resolve(cwd, requested);
        let output_path = self.cache.join(self.output_file_name(&entry)?);
        let token = self.slots.issue(&entry);

        let alias = AliasTable::resolve(&self.config.package_name, &self.config.runtime_entry, cwd);
        if let Some(target) = alias.get(&self.config.package_name) {
            if !self.fs.exists(target) {
                warn!(
                    target: "shortest::pipeline",
                    alias = %self.config.package_name,
                    path = %target.display(),
                    "runtime entry does not exist; imports of the alias will fail"
                );
            }
        }
        self.write_descriptor(&alias, &token)?;

        // A failed build must not leave an older artifact that looks valid
        if self.fs.is_file(&output_path) {
            self.fs.remove_file(&output_path)?;
        }

        let build = self.options.overlay(
            CompileOverrides::entry(&entry)
                .with_output(OutputMode::Disk(output_path.clone()))
                .with_alias(alias)
                .with_working_dir(cwd),
        );
        let output = self
            .bundler
            .build(&build)
            .map_err(|e| CompilerError::compilation(&entry, e))?;
        for warning in &output.warnings {
            warn!(target: "shortest::pipeline", entry = %entry.display(), "{}", warning);
        }

        let artifact = output
            .into_artifact(&build.output)
            .map_err(|e| CompilerError::compilation(&entry, e))?;
        let path = match artifact {
            CompiledArtifact::Disk(path) => path,
            CompiledArtifact::Memory(_) => {
                return Err(CompilerError::compilation(&entry, BundleError::NoOutput))
            }
        };
        if !self.fs.is_file(&path) {
            return Err(CompilerError::compilation(&entry, BundleError::NoOutput));
        }

        info!(
            target: "shortest::pipeline",
            source = %requested.display(),
            output = %path.display(),
            "compiled test file"
        );
        Ok(path)
    }

    /// Compile several test files in order, one result per input.
    ///
    /// A failing file does not stop the ones after it.
    pub fn compile_files<I, P>(&self, sources: I) -> Vec<Result<PathBuf, CompilerError>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        sources
            .into_iter()
            .map(|source| self.compile_file(source))
            .collect()
    }

    /// Compile a configuration file in memory and import it.
    ///
    /// Top-level code of the module has run when this returns.
    pub fn load_module(
        &self,
        source: impl AsRef<Path>,
        working_dir: impl AsRef<Path>,
    ) -> Result<ModuleObject, CompilerError> {
        let requested = source.as_ref();
        let working_dir = absolute_dir(working_dir.as_ref())?;
        let absolute = paths::resolve(&working_dir, requested);

        if !self.fs.exists(&absolute) {
            return Err(CompilerError::ConfigNotFound {
                path: requested.display().to_string(),
            });
        }

        // The alias stays a live import here; the host runtime resolves it
        let build = self.options.overlay(
            CompileOverrides::entry(&absolute)
                .with_external(self.config.package_name.clone())
                .with_working_dir(&working_dir),
        );
        let output = self
            .bundler
            .build(&build)
            .map_err(|e| CompilerError::compilation(&absolute, e))?;
        for warning in &output.warnings {
            warn!(target: "shortest::pipeline", entry = %absolute.display(), "{}", warning);
        }

        let code = match output
            .into_artifact(&build.output)
            .map_err(|e| CompilerError::compilation(&absolute, e))?
        {
            CompiledArtifact::Memory(code) => code,
            CompiledArtifact::Disk(_) => {
                return Err(CompilerError::compilation(&absolute, BundleError::NoOutput))
            }
        };

        let token = self.slots.issue(&absolute);
        let temp_file = self.cache.join(
            token.file_name(&self.config.config_file_stem, &self.config.output_extension),
        );
        let request = ImportRequest::for_path(&temp_file)?.with_working_dir(&working_dir);
        self.fs.write_file(&temp_file, code.as_bytes())?;
        debug!(
            target: "shortest::pipeline",
            source = %absolute.display(),
            temp = %temp_file.display(),
            "spilled compiled module"
        );

        // The loader has finished with the file once import returns
        let imported = self.loader.import(&request);
        if let Err(e) = self.fs.remove_file(&temp_file) {
            warn!(
                target: "shortest::pipeline",
                temp = %temp_file.display(),
                error = %e,
                "could not remove spilled module"
            );
        }
        let module = imported?;

        info!(
            target: "shortest::pipeline",
            source = %requested.display(),
            exports = module.exports().len(),
            "loaded module"
        );
        Ok(module)
    }

    /// Stage the descriptor under a per-call name, then move it into place
    fn write_descriptor(&self, alias: &AliasTable, token: &SlotToken) -> Result<(), CompilerError> {
        let json = PackageDescriptor::for_alias(alias).to_json()?;
        let staged = self.cache.join(token.file_name("package", ".json.tmp"));
        self.fs.write_file(&staged, json.as_bytes())?;
        self.fs.rename(&staged, &self.cache.descriptor_path())?;
        Ok(())
    }
}

fn current_dir() -> Result<PathBuf, CompilerError> {
    Ok(std::env::current_dir().map_err(VfsError::from)?)
}

fn absolute_dir(dir: &Path) -> Result<PathBuf, CompilerError> {
    if dir.is_absolute() {
        Ok(paths::normalize(dir))
    } else {
        Ok(paths::resolve(&current_dir()?, dir))
    }
}
