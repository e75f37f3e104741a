//! Networkify Provider 抽象库
//!
//! 定义 [`FollowGraphProvider`] Trait 以及各平台实现。
//! 上层只依赖 Trait，通过 [`create_provider`] 获取实例。

mod credentials;
mod error;
mod http_client;
mod providers;
mod traits;
mod types;

use std::sync::Arc;

pub use credentials::TOKEN_ENDPOINT;
pub use error::{ErrorKind, ProviderError, Result};
pub use http_client::{HttpResponse, HttpUtils};
pub use traits::{ErrorContext, FollowGraphProvider, ProviderErrorMapper, RawApiError};
pub use types::{
    ACCOUNT_KIND, AccountRef, EntityId, FollowRelations, ProviderCredentials, ProviderMetadata,
    ProviderType, is_account_id, normalize_account_id,
};

#[cfg(feature = "spotify")]
pub use providers::{SpotifyEndpoints, SpotifyProvider};

/// 根据类型和凭证创建 Provider 实例
pub fn create_provider(
    provider_type: ProviderType,
    credentials: ProviderCredentials,
) -> Result<Arc<dyn FollowGraphProvider>> {
    match provider_type {
        #[cfg(feature = "spotify")]
        ProviderType::Spotify => Ok(Arc::new(SpotifyProvider::new(credentials))),
        #[allow(unreachable_patterns)]
        _ => {
            let _ = credentials;
            Err(ProviderError::UnsupportedProvider(provider_type.to_string()))
        }
    }
}

/// 获取指定 Provider 的元数据
pub fn get_provider_metadata(provider_type: ProviderType) -> ProviderMetadata {
    match provider_type {
        ProviderType::Spotify => ProviderMetadata {
            id: ProviderType::Spotify,
            name: "Spotify".to_string(),
            description: "Spotify 用户之间的关注关系".to_string(),
            credential_help: format!(
                "在浏览器中登录 open.spotify.com，导出网络面板的 HAR 并粘贴，\
                 或直接粘贴 {TOKEN_ENDPOINT} 返回的 accessToken"
            ),
            profile_url_template: "https://open.spotify.com/user/{id}".to_string(),
        },
    }
}

/// 获取所有支持的 Provider 元数据
pub fn get_all_provider_metadata() -> Vec<ProviderMetadata> {
    vec![get_provider_metadata(ProviderType::Spotify)]
}
