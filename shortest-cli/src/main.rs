//! Shortest CLI - Command line interface
//!
//! Compiles test files into the cache directory, loads individual modules and
//! prints the tool's own configuration.

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use shortest_compiler::{ConfigLoader, Pipeline};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, error};

mod config;
mod logging;
mod platform;

use crate::config::{parse_log_level, LogConfig, PipelineOverrides};
use crate::logging::{LogFormat, CLI_TARGET};
use crate::platform::{print_error, print_failure};

#[derive(Parser, Debug)]
#[command(
    name = "shortest",
    about = "Shortest - compile test files and load configuration",
    version = "0.1.0"
)]
struct Cli {
    #[command(flatten)]
    logging: LoggingArgs,

    #[command(flatten)]
    pipeline: PipelineArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct LoggingArgs {
    /// 日志级别: silent, error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// 日志输出格式
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    /// Also append log events to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Per-stage level, e.g. `--log-stage bundler=debug` (repeatable)
    #[arg(long = "log-stage", global = true, value_name = "STAGE=LEVEL")]
    log_stages: Vec<String>,
}

#[derive(Args, Debug)]
struct PipelineArgs {
    /// JSON settings file with pipeline configuration
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Package name redirected to the runtime entry
    #[arg(long, global = true)]
    package_name: Option<String>,

    /// Runtime entry module, relative to the working directory
    #[arg(long, global = true, value_name = "PATH")]
    runtime_entry: Option<PathBuf>,

    /// Directory the cache directory is created in (default: system temp)
    #[arg(long, global = true, value_name = "DIR")]
    cache_root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile test files into the cache directory and print the output paths
    Compile {
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,
    },
    /// Compile a module in memory, import it and print its exports as JSON
    Load {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Directory the module is resolved and imported from
        #[arg(long, default_value = ".")]
        cwd: PathBuf,
    },
    /// Discover and print the tool configuration as JSON
    Config {
        #[arg(long, default_value = ".")]
        cwd: PathBuf,
    },
}

impl LoggingArgs {
    fn log_config(&self) -> Result<LogConfig, String> {
        let mut config = LogConfig {
            global: parse_log_level(&self.log_level)?,
            ..LogConfig::default()
        };
        for spec in &self.log_stages {
            config.set_override(spec)?;
        }
        Ok(config)
    }
}

impl From<&PipelineArgs> for PipelineOverrides {
    fn from(args: &PipelineArgs) -> Self {
        Self {
            settings: args.settings.clone(),
            package_name: args.package_name.clone(),
            runtime_entry: args.runtime_entry.clone(),
            cache_root: args.cache_root.clone(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_config = match cli.logging.log_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = logging::init(&log_config, cli.logging.log_format, cli.logging.log_file.as_deref()) {
        eprintln!("Error: cannot initialise logging: {}", e);
        process::exit(1);
    }

    let pipeline = match PipelineOverrides::from(&cli.pipeline)
        .resolve()
        .map_err(|e| e.to_string())
        .and_then(|config| Pipeline::new(config).map_err(|e| e.to_string()))
    {
        Ok(p) => p,
        Err(e) => {
            error!(target: CLI_TARGET, "{}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    debug!(target: CLI_TARGET, cache = %pipeline.cache_dir().path().display(), "pipeline ready");

    let ok = match &cli.command {
        Command::Compile { files } => handle_compile(&pipeline, files),
        Command::Load { file, cwd } => handle_load(&pipeline, file, cwd),
        Command::Config { cwd } => handle_config(&pipeline, cwd),
    };
    if !ok {
        process::exit(1);
    }
}

fn handle_compile(pipeline: &Pipeline, files: &[PathBuf]) -> bool {
    let mut ok = true;
    for (file, result) in files.iter().zip(pipeline.compile_files(files)) {
        match result {
            Ok(output) => println!("{}", output.display()),
            Err(e) => {
                print_error(file, &e);
                ok = false;
            }
        }
    }
    ok
}

fn handle_load(pipeline: &Pipeline, file: &Path, cwd: &Path) -> bool {
    match pipeline.load_module(file, cwd) {
        Ok(module) => print_json(&Value::Object(module.into_exports())),
        Err(e) => {
            print_error(file, &e);
            false
        }
    }
}

fn handle_config(pipeline: &Pipeline, cwd: &Path) -> bool {
    match ConfigLoader::new(pipeline).load(cwd) {
        Ok(value) => print_json(&value),
        Err(e) => {
            print_failure(&e);
            false
        }
    }
}

fn print_json(value: &Value) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            true
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            false
        }
    }
}
