//! 集成测试公共工具

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use networkify_core::adapters::InMemorySaveRepository;
use networkify_core::traits::DiscoveryNotifier;
use networkify_core::types::{AccountRef, ErrorKind, FollowRelations, ProviderType};
use networkify_core::{CredentialService, DiscoveryConfig, DiscoveryEngine, ServiceContext};
use networkify_provider::{FollowGraphProvider, ProviderError, Result};

/// 可编排的 Provider 桩
///
/// 未配置的账号返回空关系列表
#[derive(Default)]
pub struct StubProvider {
    current: Mutex<Option<AccountRef>>,
    responses: Mutex<HashMap<String, std::result::Result<FollowRelations, ProviderError>>>,
    delay: Mutex<Option<Duration>>,
    calls: Mutex<HashMap<String, usize>>,
    running: AtomicUsize,
    max_running: AtomicUsize,
}

impl StubProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_current(self: Arc<Self>, id: &str, name: &str) -> Arc<Self> {
        *self.current.lock().unwrap() = Some(AccountRef::new(id, name));
        self
    }

    /// 为账号配置关注列表和粉丝列表
    pub fn relations(
        self: Arc<Self>,
        id: &str,
        following: &[&str],
        followers: &[&str],
    ) -> Arc<Self> {
        let relations = FollowRelations {
            followers: refs(followers),
            following: refs(following),
        };
        self.relations_raw(id, relations)
    }

    pub fn relations_raw(self: Arc<Self>, id: &str, relations: FollowRelations) -> Arc<Self> {
        self.responses
            .lock()
            .unwrap()
            .insert(id.to_string(), Ok(relations));
        self
    }

    pub fn failing(self: Arc<Self>, id: &str, error: ProviderError) -> Arc<Self> {
        self.responses
            .lock()
            .unwrap()
            .insert(id.to_string(), Err(error));
        self
    }

    /// 每次请求前等待
    pub fn delayed(self: Arc<Self>, delay: Duration) -> Arc<Self> {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn calls(&self, id: &str) -> usize {
        self.calls.lock().unwrap().get(id).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// 观察到的最大并发请求数
    pub fn max_concurrency(&self) -> usize {
        self.max_running.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FollowGraphProvider for StubProvider {
    fn id(&self) -> ProviderType {
        ProviderType::Spotify
    }

    async fn fetch_current_account(&self) -> Result<AccountRef> {
        self.current
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ProviderError::InvalidCredentials {
                provider: "stub".to_string(),
                raw_message: None,
            })
    }

    async fn fetch_follow_relations(&self, account_id: &str) -> Result<FollowRelations> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(account_id.to_string())
            .or_default() += 1;

        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(running, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.running.fetch_sub(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .get(account_id)
            .cloned()
            .unwrap_or_else(|| Ok(FollowRelations::default()))
    }
}

/// 记录所有失败通知
#[derive(Default)]
pub struct RecordingNotifier {
    pub failures: Mutex<Vec<(String, ErrorKind)>>,
}

impl DiscoveryNotifier for RecordingNotifier {
    fn crawl_failed(&self, account_id: &str, kind: ErrorKind, _detail: &str) {
        self.failures
            .lock()
            .unwrap()
            .push((account_id.to_string(), kind));
    }
}

pub fn refs(ids: &[&str]) -> Vec<AccountRef> {
    ids.iter()
        .map(|id| AccountRef::new(*id, id.to_uppercase()))
        .collect()
}

/// 生成 `n` 个账号引用：`{prefix}0`、`{prefix}1`……
pub fn numbered(prefix: &str, n: usize) -> Vec<AccountRef> {
    (0..n)
        .map(|i| AccountRef::new(format!("{prefix}{i}"), format!("{prefix} {i}")))
        .collect()
}

pub fn network_error() -> ProviderError {
    ProviderError::NetworkError {
        provider: "stub".to_string(),
        detail: "connection reset".to_string(),
    }
}

/// 测试环境：共享上下文、引擎和桩
pub struct Harness {
    pub ctx: Arc<ServiceContext>,
    pub engine: DiscoveryEngine,
    pub provider: Arc<StubProvider>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new(provider: Arc<StubProvider>) -> Self {
        Self::with_config(provider, DiscoveryConfig::default())
    }

    pub fn with_config(provider: Arc<StubProvider>, config: DiscoveryConfig) -> Self {
        let notifier = Arc::new(RecordingNotifier::default());
        let ctx = Arc::new(
            ServiceContext::new(config, Arc::new(InMemorySaveRepository::new()))
                .with_notifier(notifier.clone()),
        );
        CredentialService::new(Arc::clone(&ctx)).set_provider(provider.clone());
        Self {
            engine: DiscoveryEngine::new(Arc::clone(&ctx)),
            ctx,
            provider,
            notifier,
        }
    }

    pub fn seed(&self, ids: &[&str]) {
        for reference in refs(ids) {
            self.ctx.state.upsert_if_absent(&reference);
        }
    }
}
