//! 凭证服务
//!
//! 负责把用户粘贴的凭证转换为 Provider 实例并挂到 [`ServiceContext`] 上。
//! 凭证只保存在内存中，不落盘。

use std::sync::Arc;

use networkify_provider::{create_provider, FollowGraphProvider};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{AccountRef, ProviderCredentials, ProviderType};

/// 凭证服务
pub struct CredentialService {
    ctx: Arc<ServiceContext>,
}

impl CredentialService {
    /// 创建凭证服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 从粘贴内容（HAR 或裸 token）设置凭证
    pub fn set_token(&self, provider_type: ProviderType, pasted: &str) -> CoreResult<()> {
        let credentials = ProviderCredentials::from_pasted(pasted)?;
        self.set_credentials(provider_type, credentials)
    }

    /// 设置凭证并创建 Provider
    pub fn set_credentials(
        &self,
        provider_type: ProviderType,
        credentials: ProviderCredentials,
    ) -> CoreResult<()> {
        let provider = create_provider(provider_type, credentials)?;
        self.set_provider(provider);
        log::info!("Credentials set for provider {provider_type}");
        Ok(())
    }

    /// 直接注入 Provider 实例
    pub fn set_provider(&self, provider: Arc<dyn FollowGraphProvider>) {
        self.ctx.replace_provider(Some(provider));
    }

    /// 清除凭证，之后的抓取会被跳过
    pub fn clear_credentials(&self) {
        self.ctx.replace_provider(None);
        log::info!("Credentials cleared");
    }

    pub fn has_credentials(&self) -> bool {
        self.ctx.provider().is_some()
    }

    /// 用当前凭证获取登录账号，用于校验凭证是否可用
    pub async fn validate(&self) -> CoreResult<AccountRef> {
        let provider = self.ctx.provider().ok_or(CoreError::NoCredential)?;
        Ok(provider.fetch_current_account().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySaveRepository;
    use crate::config::DiscoveryConfig;

    fn service() -> CredentialService {
        let ctx = ServiceContext::new(
            DiscoveryConfig::default(),
            Arc::new(InMemorySaveRepository::new()),
        );
        CredentialService::new(Arc::new(ctx))
    }

    #[test]
    fn set_and_clear_token() {
        let service = service();
        assert!(!service.has_credentials());

        service.set_token(ProviderType::Spotify, "  abc  ").unwrap();
        assert!(service.has_credentials());

        service.clear_credentials();
        assert!(!service.has_credentials());
    }

    #[test]
    fn empty_paste_is_rejected() {
        let service = service();
        let err = service.set_token(ProviderType::Spotify, "   ").unwrap_err();
        assert!(matches!(err, CoreError::Provider(_)));
        assert!(!service.has_credentials());
    }

    #[tokio::test]
    async fn validate_without_credentials() {
        let err = service().validate().await.unwrap_err();
        assert!(matches!(err, CoreError::NoCredential));
    }
}
