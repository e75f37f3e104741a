//! 配置模块
//!
//! 从 TOML 文件加载配置，文件不存在时使用默认值

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use networkify_core::DiscoveryConfig;

/// 配置文件路径环境变量
pub const CONFIG_ENV: &str = "NETWORKIFY_CONFIG";
/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 应用配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub discovery: DiscoveryConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// worker 数量，0 表示使用 CPU 核数
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: 0,
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 命名存档文件路径
    pub saves_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            saves_path: PathBuf::from("data/saves.json"),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志文件目录，不设置时只输出到终端
    pub directory: Option<PathBuf>,
    /// 输出 JSON 格式
    pub json: bool,
}

impl AppConfig {
    /// 按环境变量或默认路径加载配置
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    /// 从指定路径加载，文件不存在时返回默认配置
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 实际使用的 worker 数量
    pub fn worker_count(&self) -> usize {
        if self.server.workers == 0 {
            num_cpus::get()
        } else {
            self.server.workers
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.discovery, DiscoveryConfig::default());
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = AppConfig::parse(
            r#"
            [server]
            port = 9000
            workers = 2

            [discovery]
            exclusion_threshold = 50
            max_cascade_depth = 3

            [logging]
            json = true
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.worker_count(), 2);
        assert_eq!(config.discovery.exclusion_threshold, 50);
        assert_eq!(config.discovery.max_concurrency, 8);
        assert_eq!(config.discovery.max_cascade_depth, Some(3));
        assert!(config.logging.json);
        assert_eq!(config.storage.saves_path, PathBuf::from("data/saves.json"));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(AppConfig::parse("[server\nport = ").is_err());
    }
}
