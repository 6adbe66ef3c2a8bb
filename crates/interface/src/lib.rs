//! Taskdeck Interface - 交互层
//!
//! 职责：
//! - CLI 命令行工具
//! - 配置加载与日志初始化
//! - 启动 TUI 交互会话

pub mod cli;

#[cfg(test)]
mod cli_tests;

pub use cli::{CliConfig, CliError, OutputFormat, run_cli};
