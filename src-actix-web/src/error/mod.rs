//! 错误处理模块

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

use networkify_core::CoreError;
use networkify_provider::{ErrorKind, ProviderError};

/// API 错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("账号记录未找到: {0}")]
    AccountNotFound(String),

    #[error("存档未找到: {0}")]
    SaveNotFound(String),

    #[error("凭证错误: {0}")]
    Credential(String),

    #[error("Provider 错误: {0}")]
    Provider(String),

    #[error("存储错误: {0}")]
    Storage(String),

    #[error("请求参数错误: {0}")]
    BadRequest(String),

    #[error("未知命令: {0}")]
    UnknownCommand(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// API 响应包装
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::AccountNotFound(_) | Self::SaveNotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::UnknownCommand(_) => StatusCode::BAD_REQUEST,
            Self::Credential(_) => StatusCode::UNAUTHORIZED,
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(self.to_string()))
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err.kind() {
            ErrorKind::Auth => Self::Credential(err.to_string()),
            ErrorKind::Provider | ErrorKind::Network => Self::Provider(err.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AccountNotFound(id) => Self::AccountNotFound(id),
            CoreError::SaveNotFound(id) => Self::SaveNotFound(id),
            CoreError::NoCredential => Self::Credential(err.to_string()),
            CoreError::Provider(e) => e.into(),
            CoreError::ValidationError(_) | CoreError::ImportExportError(_) => {
                Self::BadRequest(err.to_string())
            }
            CoreError::StorageError(_) => Self::Storage(err.to_string()),
            CoreError::SerializationError(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("JSON 解析错误: {err}"))
    }
}
