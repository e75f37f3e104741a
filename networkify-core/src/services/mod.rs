//! 业务服务
//!
//! 所有服务共享同一个 [`ServiceContext`]，平台层只负责组装和暴露接口

mod account_record_service;
mod credential_service;
mod discovery_service;
mod graph_projector;
mod provider_metadata_service;
mod snapshot_service;

use std::sync::{Arc, PoisonError, RwLock};

use networkify_provider::FollowGraphProvider;

use crate::config::DiscoveryConfig;
use crate::state::DiscoveryState;
use crate::traits::{DiscoveryNotifier, LogNotifier, SaveRepository};

pub use account_record_service::AccountRecordService;
pub use credential_service::CredentialService;
pub use discovery_service::DiscoveryEngine;
pub use graph_projector::GraphProjector;
pub use provider_metadata_service::ProviderMetadataService;
pub use snapshot_service::SnapshotService;

/// 服务上下文
pub struct ServiceContext {
    /// 账号记录集合
    pub state: Arc<DiscoveryState>,
    /// 抓取配置
    pub config: DiscoveryConfig,
    /// 命名存档仓库
    pub save_repository: Arc<dyn SaveRepository>,
    /// 抓取失败通知
    pub notifier: Arc<dyn DiscoveryNotifier>,
    /// 当前凭证对应的 Provider，未设置凭证时为 `None`
    provider: RwLock<Option<Arc<dyn FollowGraphProvider>>>,
}

impl ServiceContext {
    /// 创建服务上下文，默认通过日志通知抓取失败
    #[must_use]
    pub fn new(config: DiscoveryConfig, save_repository: Arc<dyn SaveRepository>) -> Self {
        Self {
            state: Arc::new(DiscoveryState::new()),
            config,
            save_repository,
            notifier: Arc::new(LogNotifier),
            provider: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn DiscoveryNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// 当前 Provider
    pub fn provider(&self) -> Option<Arc<dyn FollowGraphProvider>> {
        self.provider
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn replace_provider(&self, provider: Option<Arc<dyn FollowGraphProvider>>) {
        *self.provider.write().unwrap_or_else(PoisonError::into_inner) = provider;
    }
}
