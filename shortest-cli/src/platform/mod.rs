//! 平台相关的输出

mod cli;

pub use cli::{format_error, print_error, print_failure};
