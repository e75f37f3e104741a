//! 核心层错误类型

use networkify_provider::ProviderError;

/// 核心层错误
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("账号记录未找到: {0}")]
    AccountNotFound(String),

    #[error("存档未找到: {0}")]
    SaveNotFound(String),

    #[error("未设置访问凭证")]
    NoCredential,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("参数校验失败: {0}")]
    ValidationError(String),

    #[error("序列化失败: {0}")]
    SerializationError(String),

    #[error("导入导出失败: {0}")]
    ImportExportError(String),

    #[error("存储错误: {0}")]
    StorageError(String),
}

/// 核心层 Result 别名
pub type CoreResult<T> = std::result::Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
