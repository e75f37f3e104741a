//! 抓取引擎
//!
//! 负责调用 Provider 抓取账号关系并整合进 [`DiscoveryState`]：
//!
//! - 同一账号同时只有一次抓取在进行，后来的调用会等待并共享同一结果
//! - 每次 Provider 调用都有超时，超时与其他失败一样记录在账号上
//! - 自动级联通过显式队列完成，由最多 `max_concurrency` 个 worker 消费
//! - 抓取在独立任务中执行，调用方放弃等待不会让计数卡住

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{self, BoxFuture, FutureExt, Shared};
use futures::stream::{self, StreamExt};

use networkify_provider::{EntityId, ErrorKind, FollowGraphProvider, ProviderError};

use crate::error::{CoreError, CoreResult};
use crate::services::{GraphProjector, ServiceContext};
use crate::state::{Activity, DiscoveryState, InFlightGuard};
use crate::types::{
    AccountRecord, BulkDiscoveryReport, CrawlState, DiscoverOptions, DiscoveryOutcome,
    FollowRelations, Graph, RecordPatch, SkipReason,
};

type CrawlFuture = Shared<BoxFuture<'static, DiscoveryOutcome>>;

/// 一次抓取的参数
#[derive(Debug, Clone)]
struct CrawlJob {
    account_id: String,
    /// 距离本轮起点的级联层数，起点为 0
    depth: u32,
    cascade: bool,
    /// 发起时集合的代数
    generation: u64,
}

struct PendingCrawl {
    generation: u64,
    /// 是否已有调用方要求级联（发起者或加入者）
    cascade: bool,
    future: CrawlFuture,
}

#[derive(Default)]
struct Frontier {
    queue: VecDeque<CrawlJob>,
    active_workers: usize,
}

struct EngineInner {
    ctx: Arc<ServiceContext>,
    projector: GraphProjector,
    pending: Mutex<HashMap<String, PendingCrawl>>,
    frontier: Mutex<Frontier>,
}

/// 抓取引擎
///
/// 克隆开销很小，所有克隆共享同一份状态
#[derive(Clone)]
pub struct DiscoveryEngine {
    inner: Arc<EngineInner>,
}

impl DiscoveryEngine {
    /// 创建抓取引擎实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                ctx,
                projector: GraphProjector::new(),
                pending: Mutex::new(HashMap::new()),
                frontier: Mutex::new(Frontier::default()),
            }),
        }
    }

    fn state(&self) -> &Arc<DiscoveryState> {
        &self.inner.ctx.state
    }

    /// 获取当前登录账号，并把集合重置为只包含该账号的一条记录
    pub async fn seed_current_account(&self) -> CoreResult<AccountRecord> {
        let provider = self.inner.ctx.provider().ok_or(CoreError::NoCredential)?;
        let account = self
            .inner
            .with_timeout(&*provider, provider.fetch_current_account())
            .await?;

        let record = AccountRecord::new_unsearched(&account);
        if record.id.is_empty() {
            return Err(CoreError::ValidationError(
                "Provider 返回的当前账号 ID 为空".to_string(),
            ));
        }

        self.inner.drain_frontier();
        self.state().replace_all(vec![record.clone()]);
        log::info!("Seeded collection with current account {}", record.id);
        Ok(record)
    }

    /// 抓取一个账号的关注关系
    ///
    /// 失败不会以 `Err` 返回，而是记录在账号上并通过通知旁路报告。
    /// 账号不存在时仍然抓取，只是没有记录可以更新状态。
    pub async fn discover(&self, account_id: &str, options: DiscoverOptions) -> DiscoveryOutcome {
        let account_id = match EntityId::parse(account_id) {
            Some(EntityId::Account(id)) => id,
            Some(EntityId::NonAccount { kind, .. }) => {
                log::debug!("Skipping {kind} entity {account_id}");
                return DiscoveryOutcome::skipped(SkipReason::NonAccount);
            }
            None => return DiscoveryOutcome::skipped(SkipReason::InvalidId),
        };
        let Some(provider) = self.inner.ctx.provider() else {
            log::debug!("No credentials, skipping crawl of {account_id}");
            return DiscoveryOutcome::skipped(SkipReason::NoCredential);
        };

        let guard = self.state().begin_operation();
        let job = CrawlJob {
            account_id,
            depth: 0,
            cascade: options.auto_cascade,
            generation: self.state().generation(),
        };
        self.inner.crawl(job, provider, guard).await
    }

    // ============ 批量抓取 ============

    /// 抓取所有满足条件的记录
    ///
    /// 命中的记录先全部进入 `Searching`，再以 `max_concurrency` 为上限并发抓取
    pub async fn discover_where<F>(
        &self,
        predicate: F,
        options: DiscoverOptions,
    ) -> BulkDiscoveryReport
    where
        F: Fn(&AccountRecord) -> bool,
    {
        let state = Arc::clone(self.state());
        let ids = state.ids_where(predicate);
        let mut report = BulkDiscoveryReport {
            requested: ids.len(),
            ..BulkDiscoveryReport::default()
        };
        if ids.is_empty() {
            return report;
        }
        let Some(provider) = self.inner.ctx.provider() else {
            report.skipped = ids.len();
            return report;
        };

        let generation = state.generation();
        state.patch_many(&ids, &RecordPatch::searching());
        state.mark_queued(ids.len());
        log::info!("Bulk discovery of {} account(s)", ids.len());

        let inner = Arc::clone(&self.inner);
        let limit = inner.ctx.config.worker_limit();
        let task = tokio::spawn(async move {
            stream::iter(ids)
                .map(|account_id| {
                    let guard = inner.ctx.state.start_queued();
                    let job = CrawlJob {
                        account_id: account_id.clone(),
                        depth: 0,
                        cascade: options.auto_cascade,
                        generation,
                    };
                    let crawl = inner.crawl(job, Arc::clone(&provider), guard);
                    async move { (account_id, crawl.await) }
                })
                .buffer_unordered(limit)
                .collect::<Vec<_>>()
                .await
        });

        match task.await {
            Ok(outcomes) => {
                for (account_id, outcome) in outcomes {
                    report.record(account_id, &outcome);
                }
            }
            Err(e) => log::error!("Bulk discovery task failed: {e}"),
        }
        report
    }

    /// 抓取所有未抓取且未排除的记录
    pub async fn discover_unsearched(&self, options: DiscoverOptions) -> BulkDiscoveryReport {
        self.discover_where(
            |r| r.crawl_state == CrawlState::NotSearched && !r.excluded_from_graph,
            options,
        )
        .await
    }

    /// 重新抓取所有失败且未排除的记录
    pub async fn rerun_errored(&self, options: DiscoverOptions) -> BulkDiscoveryReport {
        self.discover_where(
            |r| r.crawl_state == CrawlState::Error && !r.excluded_from_graph,
            options,
        )
        .await
    }

    /// 抓取所有还没有任何关系记录的账号（正在抓取的除外）
    pub async fn discover_without_relations(
        &self,
        options: DiscoverOptions,
    ) -> BulkDiscoveryReport {
        self.discover_where(
            |r| {
                r.relation_count() == 0
                    && r.crawl_state != CrawlState::Searching
                    && !r.excluded_from_graph
            },
            options,
        )
        .await
    }

    // ============ 活动与建图 ============

    /// 等待所有进行中和排队中的抓取结束
    pub async fn wait_idle(&self) {
        self.state().wait_idle().await;
    }

    pub fn is_idle(&self) -> bool {
        self.state().is_idle()
    }

    pub fn activity(&self) -> Activity {
        self.state().activity()
    }

    /// 用当前集合建图
    ///
    /// 可以随时调用；抓取进行中时得到的是中间状态，调用方通常先 [`Self::wait_idle`]
    pub fn project_graph(&self) -> Graph {
        self.inner.projector.project(&self.state().records())
    }

    /// 清空集合并丢弃排队中的级联抓取
    ///
    /// 进行中的抓取结果会被丢弃，不会写回新集合
    pub fn clear_all(&self) {
        self.inner.drain_frontier();
        self.state().clear();
        log::info!("Cleared all account records");
    }
}

impl EngineInner {
    /// 启动或加入一次抓取
    ///
    /// `guard` 由调用方在计数上预先占位，加入已有抓取或被判定过期时直接释放。
    /// 加入者要求级联而进行中的抓取不级联时，加入者在结果返回后自行把新账号入队，
    /// 期间继续占用计数
    fn crawl(
        self: &Arc<Self>,
        job: CrawlJob,
        provider: Arc<dyn FollowGraphProvider>,
        guard: InFlightGuard,
    ) -> CrawlFuture {
        let mut pending = lock(&self.pending);
        if let Some(existing) = pending.get_mut(&job.account_id) {
            if existing.generation == job.generation {
                log::debug!("Joining pending crawl of {}", job.account_id);
                if job.cascade && !existing.cascade {
                    existing.cascade = true;
                    return self.cascade_after_join(existing.future.clone(), job, guard);
                }
                return existing.future.clone();
            }
        }

        if !self.ctx.state.begin_crawl(&job.account_id, job.generation) {
            log::debug!("Dropping stale crawl of {}", job.account_id);
            return future::ready(DiscoveryOutcome::skipped(SkipReason::Superseded))
                .boxed()
                .shared();
        }

        let account_id = job.account_id.clone();
        let generation = job.generation;
        let cascade = job.cascade;
        let handle = tokio::spawn(Arc::clone(self).execute(job, provider, guard));
        let future = async move {
            handle.await.unwrap_or_else(|e| DiscoveryOutcome::Failed {
                kind: ErrorKind::Provider,
                detail: format!("crawl task aborted: {e}"),
            })
        }
        .boxed()
        .shared();

        pending.insert(
            account_id,
            PendingCrawl {
                generation,
                cascade,
                future: future.clone(),
            },
        );
        future
    }

    /// 执行一次抓取
    ///
    /// 顺序：整合结果并把级联项入队，再移除 pending 项，最后释放计数。
    /// 这样计数归零时不会有遗漏的后续工作
    async fn execute(
        self: Arc<Self>,
        job: CrawlJob,
        provider: Arc<dyn FollowGraphProvider>,
        _guard: InFlightGuard,
    ) -> DiscoveryOutcome {
        let _slot = PendingSlot {
            engine: Arc::clone(&self),
            account_id: job.account_id.clone(),
            generation: job.generation,
        };

        log::debug!("Crawling {} (depth {})", job.account_id, job.depth);
        let fetched = self
            .with_timeout(&*provider, provider.fetch_follow_relations(&job.account_id))
            .await;

        match fetched {
            Ok(relations) => self.integrate(&job, relations),
            Err(err) => self.record_failure(&job, &err),
        }
    }

    fn integrate(self: &Arc<Self>, job: &CrawlJob, relations: FollowRelations) -> DiscoveryOutcome {
        let config = &self.ctx.config;
        let Some(integration) = self.ctx.state.apply_crawl_result(
            &job.account_id,
            relations,
            config.exclusion_threshold,
            job.generation,
        ) else {
            log::debug!("Discarding stale result for {}", job.account_id);
            return DiscoveryOutcome::skipped(SkipReason::Superseded);
        };

        log::info!(
            "Crawled {}: {} new account(s){}",
            job.account_id,
            integration.created.len(),
            if integration.excluded {
                ", excluded from graph"
            } else {
                ""
            }
        );

        if job.cascade && !integration.excluded {
            self.enqueue_children(job, &integration.created);
        }

        DiscoveryOutcome::Searched {
            created: integration.created,
        }
    }

    /// 等待进行中的抓取，再按加入者的要求级联本次新建的账号
    fn cascade_after_join(
        self: &Arc<Self>,
        leader: CrawlFuture,
        job: CrawlJob,
        guard: InFlightGuard,
    ) -> CrawlFuture {
        let engine = Arc::clone(self);
        async move {
            let _guard = guard;
            let outcome = leader.await;
            if let DiscoveryOutcome::Searched { created } = &outcome {
                let children: Vec<String> = created
                    .iter()
                    .filter(|id| {
                        engine.ctx.state.get(id).is_some_and(|r| {
                            !r.excluded_from_graph && r.crawl_state == CrawlState::NotSearched
                        })
                    })
                    .cloned()
                    .collect();
                engine.enqueue_children(&job, &children);
            }
            outcome
        }
        .boxed()
        .shared()
    }

    fn enqueue_children(self: &Arc<Self>, job: &CrawlJob, children: &[String]) {
        if children.is_empty() {
            return;
        }
        let depth = job.depth + 1;
        if self.ctx.config.allows_depth(depth) {
            self.enqueue(children, depth, job.generation);
        } else {
            log::debug!("Cascade depth limit reached below {}", job.account_id);
        }
    }

    fn record_failure(&self, job: &CrawlJob, err: &ProviderError) -> DiscoveryOutcome {
        let detail = err.to_string();
        if !self
            .ctx
            .state
            .apply_crawl_failure(&job.account_id, detail.clone(), job.generation)
        {
            return DiscoveryOutcome::skipped(SkipReason::Superseded);
        }
        self.ctx
            .notifier
            .crawl_failed(&job.account_id, err.kind(), &detail);
        DiscoveryOutcome::failed(err)
    }

    async fn with_timeout<T>(
        &self,
        provider: &dyn FollowGraphProvider,
        request: impl Future<Output = networkify_provider::Result<T>>,
    ) -> networkify_provider::Result<T> {
        let limit = self.ctx.config.request_timeout();
        tokio::time::timeout(limit, request)
            .await
            .unwrap_or_else(|_| {
                Err(ProviderError::Timeout {
                    provider: provider.id().to_string(),
                    timeout_secs: limit.as_secs(),
                })
            })
    }

    // ============ 级联队列 ============

    fn enqueue(self: &Arc<Self>, ids: &[String], depth: u32, generation: u64) {
        self.ctx.state.mark_queued(ids.len());
        lock(&self.frontier)
            .queue
            .extend(ids.iter().map(|account_id| CrawlJob {
                account_id: account_id.clone(),
                depth,
                cascade: true,
                generation,
            }));
        self.pump();
    }

    /// 按需补足 worker
    fn pump(self: &Arc<Self>) {
        let limit = self.ctx.config.worker_limit();
        let mut frontier = lock(&self.frontier);
        let wanted = limit
            .saturating_sub(frontier.active_workers)
            .min(frontier.queue.len());
        for _ in 0..wanted {
            frontier.active_workers += 1;
            tokio::spawn(Arc::clone(self).run_worker());
        }
    }

    async fn run_worker(self: Arc<Self>) {
        while let Some(job) = self.next_job() {
            let guard = self.ctx.state.start_queued();
            let Some(provider) = self.ctx.provider() else {
                log::debug!("No credentials, dropping queued crawl of {}", job.account_id);
                continue;
            };
            let _ = self.crawl(job, provider, guard).await;
        }
    }

    /// 取下一项；队列为空时注销当前 worker
    fn next_job(&self) -> Option<CrawlJob> {
        let mut frontier = lock(&self.frontier);
        let job = frontier.queue.pop_front();
        if job.is_none() {
            frontier.active_workers = frontier.active_workers.saturating_sub(1);
        }
        job
    }

    fn drain_frontier(&self) {
        let drained = lock(&self.frontier).queue.drain(..).count();
        if drained > 0 {
            log::debug!("Dropped {drained} queued crawl(s)");
            self.ctx.state.release_queued(drained);
        }
    }
}

/// 抓取任务结束（包括 panic）时移除 pending 项
struct PendingSlot {
    engine: Arc<EngineInner>,
    account_id: String,
    generation: u64,
}

impl Drop for PendingSlot {
    fn drop(&mut self) {
        let mut pending = lock(&self.engine.pending);
        if pending
            .get(&self.account_id)
            .is_some_and(|p| p.generation == self.generation)
        {
            pending.remove(&self.account_id);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
