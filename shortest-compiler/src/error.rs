//! Error types for the compile-and-load pipeline

use shortest_vfs::VfsError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main pipeline error type
#[derive(Error, Debug)]
pub enum CompilerError {
    /// The requested configuration source does not exist.
    ///
    /// `path` is the path exactly as the caller gave it, before resolution.
    #[error("Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// The bundler rejected the input; its diagnostics are kept verbatim
    #[error("{source}")]
    Compilation {
        entry: PathBuf,
        #[source]
        source: BundleError,
    },

    /// The imported module failed during its own initialisation
    #[error(transparent)]
    ModuleInit(#[from] ImportError),

    #[error("IO error: {0}")]
    Io(#[from] VfsError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Stable error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigNotFound,
    Compilation,
    ModuleInit,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConfigNotFound => write!(f, "file-not-found"),
            ErrorKind::Compilation => write!(f, "compilation-failed"),
            ErrorKind::ModuleInit => write!(f, "module-init-failed"),
            ErrorKind::Io => write!(f, "io"),
        }
    }
}

impl CompilerError {
    /// The stable category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompilerError::ConfigNotFound { .. } => ErrorKind::ConfigNotFound,
            CompilerError::Compilation { .. } => ErrorKind::Compilation,
            CompilerError::ModuleInit(_) => ErrorKind::ModuleInit,
            CompilerError::Io(_) | CompilerError::Serialization(_) => ErrorKind::Io,
        }
    }

    /// User-facing error code, e.g. `file-not-found`
    pub fn code(&self) -> String {
        self.kind().to_string()
    }

    pub(crate) fn compilation(entry: impl Into<PathBuf>, source: BundleError) -> Self {
        CompilerError::Compilation {
            entry: entry.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for CompilerError {
    fn from(err: serde_json::Error) -> Self {
        CompilerError::Serialization(err.to_string())
    }
}

/// Error type for bundler components
#[derive(Error, Debug)]
pub enum BundleError {
    /// The bundler ran and refused the input (syntax error, unresolved import)
    #[error("{diagnostics}")]
    Rejected { diagnostics: String },

    #[error("failed to launch bundler '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bundler produced no output files")]
    NoOutput,

    #[error("bundler output is not valid UTF-8")]
    InvalidOutput,

    #[error("bundler output could not be read: {0}")]
    Vfs(#[from] VfsError),
}

/// Error type for module loader components
#[derive(Error, Debug)]
pub enum ImportError {
    /// The module threw or rejected while running its top-level code
    #[error("{message}")]
    Initialization { url: String, message: String },

    #[error("failed to launch module loader '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("module loader returned malformed exports: {0}")]
    MalformedExports(String),
}
