//! 抓取相关类型定义

use serde::{Deserialize, Serialize};

use networkify_provider::{ErrorKind, ProviderError};

/// 抓取选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverOptions {
    /// 自动抓取本次新发现的账号
    #[serde(default)]
    pub auto_cascade: bool,
}

impl DiscoverOptions {
    pub fn cascading() -> Self {
        Self { auto_cascade: true }
    }
}

/// 跳过抓取的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// 空 ID
    InvalidId,
    /// 非账号实体（如 artist）
    NonAccount,
    /// 未设置访问凭证
    NoCredential,
    /// 集合在抓取期间被清空或替换
    Superseded,
}

/// 单次抓取的结果
///
/// 抓取失败不会以 `Err` 返回，而是记录在账号上并体现在这里
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DiscoveryOutcome {
    /// 抓取成功，`created` 为本次新建的记录 ID
    Searched { created: Vec<String> },
    /// 抓取失败
    Failed { kind: ErrorKind, detail: String },
    /// 未发起抓取
    Skipped { reason: SkipReason },
}

impl DiscoveryOutcome {
    pub(crate) fn failed(error: &ProviderError) -> Self {
        Self::Failed {
            kind: error.kind(),
            detail: error.to_string(),
        }
    }

    pub(crate) fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    pub fn is_searched(&self) -> bool {
        matches!(self, Self::Searched { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// 新建记录数量
    pub fn created_count(&self) -> usize {
        match self {
            Self::Searched { created } => created.len(),
            _ => 0,
        }
    }
}

/// 批量抓取报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDiscoveryReport {
    /// 命中条件的记录数量
    pub requested: usize,
    pub searched: usize,
    pub failed: usize,
    pub skipped: usize,
    /// 新建记录总数
    pub created: usize,
    /// 失败的账号 ID
    pub failed_ids: Vec<String>,
}

impl BulkDiscoveryReport {
    pub(crate) fn record(&mut self, account_id: String, outcome: &DiscoveryOutcome) {
        match outcome {
            DiscoveryOutcome::Searched { created } => {
                self.searched += 1;
                self.created += created.len();
            }
            DiscoveryOutcome::Failed { .. } => {
                self.failed += 1;
                self.failed_ids.push(account_id);
            }
            DiscoveryOutcome::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// 各抓取状态的记录数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlSummary {
    pub total: usize,
    pub not_searched: usize,
    pub searching: usize,
    pub searched: usize,
    pub error: usize,
    pub excluded: usize,
}
