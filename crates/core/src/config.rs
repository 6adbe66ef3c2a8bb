//! Taskdeck 配置系统
//!
//! 支持 YAML 配置文件和环境变量

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Default location of the config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = ".taskdeck/config.yaml";

pub const ENV_BACKEND: &str = "TASKDECK_BACKEND";
pub const ENV_BASE_URL: &str = "TASKDECK_BASE_URL";
pub const ENV_DATA_DIR: &str = "TASKDECK_DATA_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("unknown backend '{0}' (expected 'remote' or 'local')")]
    UnknownBackend(String),
}

/// Which task store implementation backs the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Remote,
    Local,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" | "http" => Ok(Self::Remote),
            "local" | "file" => Ok(Self::Local),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Taskdeck 主配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskdeckConfig {
    /// 存储后端
    #[serde(default)]
    pub backend: BackendKind,

    /// 远程 API 配置
    #[serde(default)]
    pub remote: RemoteConfig,

    /// 本地存储配置
    #[serde(default)]
    pub local: LocalConfig,
}

/// 远程 API 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// API 基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 每次拉取的最大条数
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,

    /// 新建任务时提交的 userId
    #[serde(default = "default_user_id")]
    pub user_id: u64,

    /// 请求超时 (秒)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://jsonplaceholder.typicode.com".to_string()
}

fn default_fetch_limit() -> usize {
    10
}

fn default_user_id() -> u64 {
    1
}

fn default_timeout() -> u64 {
    30
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            fetch_limit: default_fetch_limit(),
            user_id: default_user_id(),
            timeout_secs: default_timeout(),
        }
    }
}

/// 本地存储配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalConfig {
    /// 数据目录
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// 持久化集合所用的键
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// 模拟延迟 (毫秒)
    #[serde(default)]
    pub simulated_latency_ms: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".taskdeck/data")
}

fn default_storage_key() -> String {
    "taskdeck.todos".to_string()
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
            simulated_latency_ms: 0,
        }
    }
}

impl TaskdeckConfig {
    /// Parse a YAML document. Missing sections fall back to defaults.
    pub fn from_yaml(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load from an explicit path; the file must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content, path)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load from `path` when given, otherwise from the default location if it
    /// exists, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply `TASKDECK_*` overrides; `lookup` is usually `std::env::var`.
    pub fn apply_overrides_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(backend) = lookup(ENV_BACKEND).filter(|v| !v.trim().is_empty()) {
            self.backend = backend.parse()?;
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.remote.base_url = url.trim().to_string();
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.local.data_dir = PathBuf::from(dir.trim());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = TaskdeckConfig::default();
        assert_eq!(config.backend, BackendKind::Remote);
        assert_eq!(config.remote.base_url, "https://jsonplaceholder.typicode.com");
        assert_eq!(config.remote.fetch_limit, 10);
        assert_eq!(config.local.storage_key, "taskdeck.todos");
        assert_eq!(config.local.simulated_latency_ms, 0);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "backend: local\nlocal:\n  simulated_latency_ms: 250\n";
        let config = TaskdeckConfig::from_yaml(yaml, Path::new("inline")).unwrap();
        assert_eq!(config.backend, BackendKind::Local);
        assert_eq!(config.local.simulated_latency_ms, 250);
        assert_eq!(config.local.data_dir, PathBuf::from(".taskdeck/data"));
        assert_eq!(config.remote, RemoteConfig::default());
    }

    #[test]
    fn test_invalid_yaml_reports_path() {
        let err = TaskdeckConfig::from_yaml("backend: [", Path::new("broken.yaml")).unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "remote:\n  base_url: http://localhost:3000\n").unwrap();
        let config = TaskdeckConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.remote.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(matches!(
            TaskdeckConfig::load_or_default(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BACKEND, "LOCAL"),
            (ENV_DATA_DIR, "/tmp/taskdeck"),
            (ENV_BASE_URL, "  "),
        ]);
        let mut config = TaskdeckConfig::default();
        config
            .apply_overrides_from(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.backend, BackendKind::Local);
        assert_eq!(config.local.data_dir, PathBuf::from("/tmp/taskdeck"));
        assert_eq!(config.remote.base_url, default_base_url());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let mut config = TaskdeckConfig::default();
        let result = config.apply_overrides_from(|key| {
            (key == ENV_BACKEND).then(|| "carrier-pigeon".to_string())
        });
        assert!(matches!(result, Err(ConfigError::UnknownBackend(_))));
    }
}
