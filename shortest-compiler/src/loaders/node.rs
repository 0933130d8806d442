//! Node Module Loader - 通过 node 动态导入编译后的模块

use crate::component::{Component, ComponentKind, ComponentMetadata};
use crate::error::ImportError;
use crate::module_loader::{ImportRequest, ModuleLoader, ModuleObject};
use serde_json::Value;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// Precedes the JSON namespace on stdout, so anything the module prints
/// during initialisation can be told apart from the result.
pub const EXPORTS_MARKER: &str = "\u{1e}shortest-exports\u{1e}";

/// Imports the URL in `argv[1]` and prints its namespace as JSON.
///
/// Only an object already on the current path counts as circular; values
/// shared between exports or fields are serialised at every occurrence.
const BOOTSTRAP: &str = r#"
const url = process.argv[1];
const namespace = await import(url);
const toPlain = (value, ancestors) => {
  if (typeof value === "function") return `[Function ${value.name || "anonymous"}]`;
  if (typeof value === "bigint" || typeof value === "symbol") return value.toString();
  if (value === undefined) return null;
  if (value === null || typeof value !== "object") return value;
  if (ancestors.includes(value)) return "[Circular]";
  if (typeof value.toJSON === "function") return toPlain(value.toJSON(), ancestors);
  ancestors.push(value);
  let plain;
  if (Array.isArray(value)) {
    plain = value.map((item) => toPlain(item, ancestors));
  } else {
    plain = {};
    for (const key of Object.keys(value)) plain[key] = toPlain(value[key], ancestors);
  }
  ancestors.pop();
  return plain;
};
const exports = {};
for (const name of Object.keys(namespace)) exports[name] = toPlain(namespace[name], []);
process.stdout.write("__MARKER__" + JSON.stringify(exports));
"#;

/// Module loader that imports modules with a `node` child process
#[derive(Debug, Clone)]
pub struct NodeModuleLoader {
    program: PathBuf,
}

impl NodeModuleLoader {
    /// Use `node` from `PATH`
    pub fn new() -> Self {
        Self::with_program("node")
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn bootstrap() -> String {
        BOOTSTRAP.replace("__MARKER__", EXPORTS_MARKER)
    }

    /// Pull the exports object out of the loader's stdout
    pub fn parse_exports(url: &str, stdout: &str) -> Result<ModuleObject, ImportError> {
        let start = stdout
            .rfind(EXPORTS_MARKER)
            .ok_or_else(|| ImportError::MalformedExports("exports marker missing".to_string()))?;
        let json = &stdout[start + EXPORTS_MARKER.len()..];
        match serde_json::from_str::<Value>(json) {
            Ok(Value::Object(exports)) => Ok(ModuleObject::new(url, exports)),
            Ok(other) => Err(ImportError::MalformedExports(format!(
                "expected an object, got {}",
                other
            ))),
            Err(e) => Err(ImportError::MalformedExports(e.to_string())),
        }
    }
}

impl Default for NodeModuleLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for NodeModuleLoader {
    fn metadata(&self) -> ComponentMetadata {
        ComponentMetadata::new(
            "node",
            "0.1.0",
            ComponentKind::ModuleLoader,
            Some("通过 node 动态导入 ES 模块"),
        )
    }
}

impl ModuleLoader for NodeModuleLoader {
    fn import(&self, request: &ImportRequest) -> Result<ModuleObject, ImportError> {
        debug!(target: "shortest::loader", url = %request.url, "importing module");

        let mut command = Command::new(&self.program);
        command
            .arg("--input-type=module")
            .arg("-e")
            .arg(Self::bootstrap())
            .arg(&request.url)
            .stdin(Stdio::null());
        if let Some(dir) = &request.working_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| ImportError::Launch {
            program: self.program.display().to_string(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("module loader exited with {}", output.status)
            } else {
                stderr
            };
            return Err(ImportError::Initialization {
                url: request.url.clone(),
                message,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_exports(&request.url, &stdout)
    }
}
