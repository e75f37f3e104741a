//! 应用状态

use std::sync::Arc;

use networkify_core::{
    AccountRecordService, CredentialService, DiscoveryEngine, ProviderMetadataService,
    ServiceContext, SnapshotService,
};

/// 应用状态，各 worker 共享同一组服务
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<ServiceContext>,
    pub engine: DiscoveryEngine,
    pub records: Arc<AccountRecordService>,
    pub snapshots: Arc<SnapshotService>,
    pub credentials: Arc<CredentialService>,
    pub providers: Arc<ProviderMetadataService>,
}

impl AppState {
    pub fn new(ctx: ServiceContext) -> Self {
        let ctx = Arc::new(ctx);
        Self {
            engine: DiscoveryEngine::new(Arc::clone(&ctx)),
            records: Arc::new(AccountRecordService::new(Arc::clone(&ctx))),
            snapshots: Arc::new(SnapshotService::new(Arc::clone(&ctx))),
            credentials: Arc::new(CredentialService::new(Arc::clone(&ctx))),
            providers: Arc::new(ProviderMetadataService::new()),
            ctx,
        }
    }
}
