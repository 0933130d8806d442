//! CLI 配置
//!
//! 日志配置，以及命令行参数与设置文件合并后的流水线配置

use shortest_config::{PipelineConfig, Stage};
use std::path::{Path, PathBuf};
use tracing::Level;

/// CLI 日志配置
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: Level,
    pub cache: Option<Level>,
    pub bundler: Option<Level>,
    pub loader: Option<Level>,
    pub pipeline: Option<Level>,
    pub config: Option<Level>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: Level::INFO,
            cache: None,
            bundler: None,
            loader: None,
            pipeline: None,
            config: None,
        }
    }
}

impl LogConfig {
    /// Get log level for a specific stage
    pub fn level_for(&self, stage: Stage) -> Level {
        let level = match stage {
            Stage::Cache => self.cache,
            Stage::Bundler => self.bundler,
            Stage::Loader => self.loader,
            Stage::Pipeline => self.pipeline,
            Stage::Config => self.config,
        };
        level.unwrap_or(self.global)
    }

    /// Apply one `stage=level` override, e.g. `bundler=debug`
    pub fn set_override(&mut self, spec: &str) -> Result<(), String> {
        let (name, level) = spec
            .split_once('=')
            .ok_or_else(|| format!("expected STAGE=LEVEL, got '{}'", spec))?;
        let stage = Stage::ALL
            .into_iter()
            .find(|s| s.as_str() == name.trim())
            .ok_or_else(|| format!("unknown log stage '{}'", name))?;
        let level = Some(parse_log_level(level.trim())?);
        match stage {
            Stage::Cache => self.cache = level,
            Stage::Bundler => self.bundler = level,
            Stage::Loader => self.loader = level,
            Stage::Pipeline => self.pipeline = level,
            Stage::Config => self.config = level,
        }
        Ok(())
    }
}

/// Parse log level string
pub fn parse_log_level(s: &str) -> Result<Level, String> {
    match s.to_lowercase().as_str() {
        "silent" => Ok(Level::ERROR), // silent = only errors
        "error" => Ok(Level::ERROR),
        "warn" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        other => Err(format!("unknown log level '{}'", other)),
    }
}

/// 命令行上对流水线配置的覆盖项
#[derive(Debug, Clone, Default)]
pub struct PipelineOverrides {
    pub settings: Option<PathBuf>,
    pub package_name: Option<String>,
    pub runtime_entry: Option<PathBuf>,
    pub cache_root: Option<PathBuf>,
}

impl PipelineOverrides {
    /// Settings file (or defaults) with the flags applied on top
    pub fn resolve(&self) -> Result<PipelineConfig, String> {
        let mut config = match &self.settings {
            Some(path) => read_settings(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(name) = &self.package_name {
            config.package_name = name.clone();
        }
        if let Some(entry) = &self.runtime_entry {
            config.runtime_entry = entry.clone();
        }
        if let Some(root) = &self.cache_root {
            config.temp_root = Some(root.clone());
        }
        Ok(config)
    }
}

fn read_settings(path: &Path) -> Result<PipelineConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("无法读取 '{}': {}", path.display(), e))?;
    PipelineConfig::from_json(&content).map_err(|e| format!("解析 '{}' 失败: {}", path.display(), e))
}
