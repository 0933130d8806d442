//! Component trait definitions
//!
//! The bundler and the module loader are external capabilities; both are
//! plugged into the pipeline as components that describe themselves.

use std::fmt;

/// The kind of component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Bundler: turns a source entry into a self-contained module
    Bundler,
    /// ModuleLoader: imports a compiled module into the host runtime
    ModuleLoader,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Bundler => write!(f, "bundler"),
            ComponentKind::ModuleLoader => write!(f, "module_loader"),
        }
    }
}

/// Metadata about a component
#[derive(Debug, Clone)]
pub struct ComponentMetadata {
    /// The component name (unique identifier)
    pub name: &'static str,
    /// The component version
    pub version: &'static str,
    /// The kind of component
    pub kind: ComponentKind,
    /// Optional description
    pub description: Option<&'static str>,
}

impl ComponentMetadata {
    /// Create new metadata
    pub fn new(
        name: &'static str,
        version: &'static str,
        kind: ComponentKind,
        description: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            version,
            kind,
            description,
        }
    }
}

/// The base trait for pipeline components
pub trait Component: Send + Sync {
    /// Get the component metadata
    fn metadata(&self) -> ComponentMetadata;

    /// Get the component name
    fn name(&self) -> &'static str {
        self.metadata().name
    }
}
