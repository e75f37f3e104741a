//! Provider 元数据服务
//!
//! 提供各平台的静态说明（名称、凭证获取方式、主页地址模板），无状态

use networkify_provider::{get_all_provider_metadata, get_provider_metadata};

use crate::types::{ProviderMetadata, ProviderType};

/// Provider 元数据服务（无状态）
pub struct ProviderMetadataService;

impl ProviderMetadataService {
    /// 创建 Provider 元数据服务实例
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// 获取所有支持的平台
    pub fn list_providers(&self) -> Vec<ProviderMetadata> {
        get_all_provider_metadata()
    }

    /// 账号主页地址
    pub fn profile_url(&self, provider: ProviderType, account_id: &str) -> String {
        get_provider_metadata(provider)
            .profile_url_template
            .replace("{id}", account_id)
    }
}

impl Default for ProviderMetadataService {
    fn default() -> Self {
        Self::new()
    }
}
