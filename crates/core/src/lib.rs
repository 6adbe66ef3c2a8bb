// Taskdeck Core - 核心数据模型
//!
//! 包含：
//! - Task: 任务记录与标题校验
//! - Seed: 本地存储的示例数据
//! - Config: 配置加载

mod task;
mod seed;
pub mod config;

pub use task::*;
pub use seed::*;
pub use config::{BackendKind, ConfigError, LocalConfig, RemoteConfig, TaskdeckConfig};
