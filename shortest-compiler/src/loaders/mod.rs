//! Module loader implementations

mod node;

pub use node::{NodeModuleLoader, EXPORTS_MARKER};
