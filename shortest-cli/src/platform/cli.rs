//! CLI 格式化输出
//!
//! 提供命令行友好的错误显示。Bundler diagnostics are printed verbatim under
//! the failing file so line and column references stay intact.

use shortest_compiler::{CompilerError, ConfigError};
use std::path::Path;

/// Render a pipeline error for `subject`, one line per diagnostic line
pub fn format_error(subject: &Path, e: &CompilerError) -> String {
    let mut out = format!("❌ {} [{}]", subject.display(), e.code());
    match e {
        CompilerError::Compilation { source, .. } => {
            let text = source.to_string();
            let lines: Vec<&str> = text.lines().collect();
            let width = lines.len().to_string().len();
            out.push('\n');
            out.push_str(&format!("{}|--", "-".repeat(width + 1)));
            for line in lines {
                out.push('\n');
                out.push_str(&format!("{} | {}", " ".repeat(width), line));
            }
            out.push('\n');
            out.push_str(&format!("{}|--", "-".repeat(width + 1)));
        }
        other => {
            out.push_str(": ");
            out.push_str(&other.to_string());
        }
    }
    out
}

/// 打印流水线错误
pub fn print_error(subject: &Path, e: &CompilerError) {
    eprintln!("{}", format_error(subject, e));
}

/// 打印配置加载错误
pub fn print_failure(e: &ConfigError) {
    match e {
        ConfigError::Load(inner) => eprintln!("{}", format_error(Path::new("config"), inner)),
        other => eprintln!("❌ [{}] {}", other.code(), other),
    }
}
