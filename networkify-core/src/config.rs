//! 抓取引擎配置

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 默认排除阈值：任一关系列表超过该数量时，新建记录默认不进入图
pub const DEFAULT_EXCLUSION_THRESHOLD: usize = 100;
/// 默认级联抓取并发数
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
/// 默认单次请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 抓取引擎配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DiscoveryConfig {
    /// 关系列表长度严格大于该值时，新建记录被标记为排除
    pub exclusion_threshold: usize,
    /// 级联与批量抓取的最大并发数
    pub max_concurrency: usize,
    /// 单次 Provider 调用超时（秒）
    pub request_timeout_secs: u64,
    /// 级联最大深度，`None` 为不限
    pub max_cascade_depth: Option<u32>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            exclusion_threshold: DEFAULT_EXCLUSION_THRESHOLD,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_cascade_depth: None,
        }
    }
}

impl DiscoveryConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// 实际使用的并发上限，至少为 1
    pub fn worker_limit(&self) -> usize {
        self.max_concurrency.max(1)
    }

    /// 深度为 `depth` 的记录是否还允许继续级联
    pub fn allows_depth(&self, depth: u32) -> bool {
        self.max_cascade_depth.is_none_or(|max| depth <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.exclusion_threshold, 100);
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.allows_depth(u32::MAX));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: DiscoveryConfig =
            serde_json::from_str(r#"{"max_concurrency": 0, "max_cascade_depth": 2}"#).unwrap();
        assert_eq!(config.exclusion_threshold, 100);
        assert_eq!(config.worker_limit(), 1);
        assert!(config.allows_depth(2));
        assert!(!config.allows_depth(3));
    }
}
