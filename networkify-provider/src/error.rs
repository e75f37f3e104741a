//! Provider 错误类型
//!
//! 所有 Provider 返回的错误都会被归一化为 [`ProviderError`]，
//! 并可通过 [`ProviderError::kind`] 折叠为三类：认证 / 上游响应 / 网络。

use serde::{Deserialize, Serialize};

/// 错误大类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// 凭证缺失或无效
    Auth,
    /// 上游响应格式异常
    Provider,
    /// 传输层失败（含超时）
    Network,
}

/// Provider 错误
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// 未提供访问凭证
    #[error("[{provider}] 未提供访问凭证")]
    MissingCredential { provider: String },

    /// 凭证无效或已过期
    #[error("[{provider}] 凭证无效: {}", raw_message.as_deref().unwrap_or("unknown"))]
    InvalidCredentials {
        provider: String,
        raw_message: Option<String>,
    },

    /// 网络请求失败
    #[error("[{provider}] 网络错误: {detail}")]
    NetworkError { provider: String, detail: String },

    /// 请求超时
    #[error("[{provider}] 请求超时 ({timeout_secs}s)")]
    Timeout { provider: String, timeout_secs: u64 },

    /// 响应解析失败
    #[error("[{provider}] 响应解析失败: {detail}")]
    ParseError { provider: String, detail: String },

    /// 响应状态或结构不符合预期
    #[error("[{provider}] 非预期响应 (HTTP {status}): {detail}")]
    UnexpectedResponse {
        provider: String,
        status: u16,
        detail: String,
    },

    /// 请求体序列化失败
    #[error("[{provider}] 序列化失败: {detail}")]
    SerializationError { provider: String, detail: String },

    /// 当前构建未启用的 Provider
    #[error("不支持的 Provider: {0}")]
    UnsupportedProvider(String),

    /// 其他未归类错误
    #[error("[{provider}] {raw_message}")]
    Unknown {
        provider: String,
        raw_message: String,
    },
}

impl ProviderError {
    /// 错误大类
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredential { .. } | Self::InvalidCredentials { .. } => ErrorKind::Auth,
            Self::NetworkError { .. } | Self::Timeout { .. } => ErrorKind::Network,
            Self::ParseError { .. }
            | Self::UnexpectedResponse { .. }
            | Self::SerializationError { .. }
            | Self::UnsupportedProvider(_)
            | Self::Unknown { .. } => ErrorKind::Provider,
        }
    }

    /// 是否为认证错误（需要用户重新获取 token）
    pub fn is_auth(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }
}

/// Provider 结果类型
pub type Result<T> = std::result::Result<T, ProviderError>;
