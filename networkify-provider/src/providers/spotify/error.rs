//! Spotify 错误映射

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::SpotifyProvider;

/// Spotify 状态码映射
///
/// 私有接口没有稳定的错误码，只能依据 HTTP 状态判断
impl ProviderErrorMapper for SpotifyProvider {
    fn provider_name(&self) -> &'static str {
        "spotify"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.status {
            // token 过期或无效
            Some(401) => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },
            Some(status) => {
                let target = context
                    .account_id
                    .map(|id| format!(" ({id})"))
                    .unwrap_or_default();
                ProviderError::UnexpectedResponse {
                    provider: self.provider_name().to_string(),
                    status,
                    detail: format!(
                        "{}{target}: {}",
                        context.operation.unwrap_or("request"),
                        raw.message
                    ),
                }
            }
            // 其他错误 fallback
            None => self.unknown_error(raw),
        }
    }
}
