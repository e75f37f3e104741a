//! Provider 抽象 Trait

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{AccountRef, FollowRelations, ProviderMetadata, ProviderType};

/// 关注图 Provider Trait
///
/// 每个实例绑定一份访问凭证，负责：
/// - 查询凭证对应的当前账号
/// - 查询指定账号的粉丝 / 关注列表
#[async_trait]
pub trait FollowGraphProvider: Send + Sync {
    /// Provider 标识
    fn id(&self) -> ProviderType;

    /// 获取当前凭证对应的账号
    ///
    /// 凭证缺失或无效时返回认证错误，响应结构异常时返回解析错误
    async fn fetch_current_account(&self) -> Result<AccountRef>;

    /// 获取指定账号的关注关系
    ///
    /// 空列表是合法结果，不视为错误
    ///
    /// # Arguments
    /// * `account_id` - 裸账号 ID
    async fn fetch_follow_relations(&self, account_id: &str) -> Result<FollowRelations>;

    /// 静态元数据
    fn metadata(&self) -> ProviderMetadata {
        crate::get_provider_metadata(self.id())
    }
}

// ============ 错误映射 ============

/// 上游原始错误
#[derive(Debug, Clone)]
pub struct RawApiError {
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文（用于生成更具体的错误信息）
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub account_id: Option<String>,
    pub operation: Option<&'static str>,
}

impl ErrorContext {
    pub fn for_account(account_id: &str, operation: &'static str) -> Self {
        Self {
            account_id: Some(account_id.to_string()),
            operation: Some(operation),
        }
    }
}

/// 上游错误映射 Trait
///
/// 各 Provider 实现 `map_error`，其余辅助方法提供统一的错误构造
pub trait ProviderErrorMapper {
    /// Provider 名称（用于错误消息）
    fn provider_name(&self) -> &'static str;

    /// 将上游原始错误映射为 [`ProviderError`]
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    fn network_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::NetworkError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_message: raw.message,
        }
    }
}
