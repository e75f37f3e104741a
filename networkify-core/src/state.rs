//! 抓取状态容器
//!
//! [`DiscoveryState`] 是账号记录集合的唯一数据源。所有修改都在一次写锁内完成，
//! 锁从不跨越 `.await`，因此其他任务看不到半更新的记录。
//!
//! 活动计数（进行中 / 排队中的抓取）通过 `tokio::sync::watch` 广播，
//! 调用方据此判断是否可以重新建图。

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use networkify_provider::{AccountRef, EntityId, FollowRelations};

use crate::types::{AccountRecord, RecordPatch};

/// 抓取活动快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// 正在请求 Provider 的抓取数量
    pub in_flight: usize,
    /// 已排队但尚未开始的级联 / 批量抓取数量
    pub queued: usize,
}

impl Activity {
    pub fn is_idle(&self) -> bool {
        self.in_flight == 0 && self.queued == 0
    }
}

/// 一次成功抓取的整合结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlIntegration {
    /// 新建记录的 ID（按关系列表顺序）
    pub created: Vec<String>,
    /// 新建记录是否因超过阈值被排除
    pub excluded: bool,
}

#[derive(Debug, Default)]
struct Records {
    by_id: IndexMap<String, AccountRecord>,
    /// 每次清空 / 整体替换时递增，用于丢弃过期的抓取结果
    generation: u64,
}

/// 账号记录集合与抓取活动
#[derive(Debug)]
pub struct DiscoveryState {
    records: RwLock<Records>,
    activity: watch::Sender<Activity>,
}

impl Default for DiscoveryState {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscoveryState {
    #[must_use]
    pub fn new() -> Self {
        let (activity, _) = watch::channel(Activity::default());
        Self {
            records: RwLock::new(Records::default()),
            activity,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Records> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Records> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ============ 记录读取 ============

    pub fn get(&self, id: &str) -> Option<AccountRecord> {
        self.read().by_id.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().by_id.contains_key(id)
    }

    /// 按插入顺序返回全部记录
    pub fn records(&self) -> Vec<AccountRecord> {
        self.read().by_id.values().cloned().collect()
    }

    /// 满足条件的记录 ID（按插入顺序）
    pub fn ids_where(&self, predicate: impl Fn(&AccountRecord) -> bool) -> Vec<String> {
        self.read()
            .by_id
            .values()
            .filter(|record| predicate(record))
            .map(|record| record.id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().by_id.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    // ============ 记录修改 ============

    /// 不存在时插入一条 `NotSearched` 记录，返回是否新建
    ///
    /// 非账号实体和空 ID 不会入库
    pub fn upsert_if_absent(&self, reference: &AccountRef) -> bool {
        if !reference.is_account() {
            return false;
        }
        self.insert_if_absent(AccountRecord::new_unsearched(reference))
    }

    /// 不存在时插入给定记录，返回是否新建
    pub fn insert_if_absent(&self, record: AccountRecord) -> bool {
        let mut records = self.write();
        if records.by_id.contains_key(&record.id) {
            return false;
        }
        records.by_id.insert(record.id.clone(), record);
        true
    }

    /// 合并部分字段，记录不存在时不做任何事，返回是否命中
    pub fn patch(&self, id: &str, patch: RecordPatch) -> bool {
        match self.write().by_id.get_mut(id) {
            Some(record) => {
                patch.apply(record);
                true
            }
            None => false,
        }
    }

    /// 对多条记录应用同一补丁，返回命中数量
    pub fn patch_many(&self, ids: &[String], patch: &RecordPatch) -> usize {
        let mut records = self.write();
        let mut hit = 0;
        for id in ids {
            if let Some(record) = records.by_id.get_mut(id) {
                patch.clone().apply(record);
                hit += 1;
            }
        }
        hit
    }

    /// 整体替换集合
    ///
    /// 记录会先被修正以满足不变量，ID 重复时保留第一条。
    /// 返回 `(保留数量, 重复数量, 修正数量)`
    pub fn replace_all(&self, incoming: Vec<AccountRecord>) -> (usize, usize, usize) {
        let mut by_id = IndexMap::with_capacity(incoming.len());
        let mut duplicates = 0;
        let mut repaired = 0;

        for mut record in incoming {
            if record.normalize() {
                repaired += 1;
            }
            if record.id.is_empty() || by_id.contains_key(&record.id) {
                duplicates += 1;
                continue;
            }
            by_id.insert(record.id.clone(), record);
        }

        let kept = by_id.len();
        let mut records = self.write();
        records.by_id = by_id;
        records.generation += 1;
        (kept, duplicates, repaired)
    }

    /// 清空集合
    pub fn clear(&self) {
        let mut records = self.write();
        records.by_id.clear();
        records.generation += 1;
    }

    /// 抓取开始：记录存在时进入 `Searching`
    ///
    /// 集合已不是 `generation` 代时返回 `false`，不做任何修改
    pub(crate) fn begin_crawl(&self, id: &str, generation: u64) -> bool {
        let mut records = self.write();
        if records.generation != generation {
            return false;
        }
        if let Some(record) = records.by_id.get_mut(id) {
            RecordPatch::searching().apply(record);
        }
        true
    }

    /// 抓取成功后的整合，在一次写锁内完成
    ///
    /// 集合在抓取期间被清空或替换时返回 `None`，结果被丢弃
    pub(crate) fn apply_crawl_result(
        &self,
        id: &str,
        relations: FollowRelations,
        exclusion_threshold: usize,
        generation: u64,
    ) -> Option<CrawlIntegration> {
        let mut records = self.write();
        if records.generation != generation {
            return None;
        }

        let excluded = exceeds_threshold(&relations, exclusion_threshold);
        let mut created = Vec::new();
        for reference in relations.followers.iter().chain(&relations.following) {
            let Some(EntityId::Account(account_id)) = EntityId::parse(&reference.id) else {
                continue;
            };
            if records.by_id.contains_key(&account_id) {
                continue;
            }
            let record = AccountRecord::new_unsearched(reference).excluded(excluded);
            records.by_id.insert(account_id.clone(), record);
            created.push(account_id);
        }

        if let Some(record) = records.by_id.get_mut(id) {
            RecordPatch::searched(relations).apply(record);
        }

        Some(CrawlIntegration { created, excluded })
    }

    /// 抓取失败：记录进入 `Error`，过期时返回 `false`
    pub(crate) fn apply_crawl_failure(&self, id: &str, detail: String, generation: u64) -> bool {
        let mut records = self.write();
        if records.generation != generation {
            return false;
        }
        if let Some(record) = records.by_id.get_mut(id) {
            RecordPatch::failed(detail).apply(record);
        }
        true
    }

    // ============ 活动计数 ============

    pub fn activity(&self) -> Activity {
        *self.activity.borrow()
    }

    pub fn is_idle(&self) -> bool {
        self.activity().is_idle()
    }

    /// 订阅活动变化
    pub fn subscribe(&self) -> watch::Receiver<Activity> {
        self.activity.subscribe()
    }

    pub fn increment_in_flight(&self) {
        self.activity.send_modify(|a| a.in_flight += 1);
    }

    /// 递减进行中计数，不会低于 0
    pub fn decrement_in_flight(&self) {
        self.activity
            .send_modify(|a| a.in_flight = a.in_flight.saturating_sub(1));
    }

    /// 开始一次抓取，返回的守卫在析构时递减计数
    pub fn begin_operation(self: &Arc<Self>) -> InFlightGuard {
        self.increment_in_flight();
        InFlightGuard {
            state: Arc::clone(self),
        }
    }

    pub(crate) fn mark_queued(&self, n: usize) {
        if n > 0 {
            self.activity.send_modify(|a| a.queued += n);
        }
    }

    /// 排队项转为进行中，两个计数在同一次更新内变化，中间不会出现空闲
    pub(crate) fn start_queued(self: &Arc<Self>) -> InFlightGuard {
        self.activity.send_modify(|a| {
            a.queued = a.queued.saturating_sub(1);
            a.in_flight += 1;
        });
        InFlightGuard {
            state: Arc::clone(self),
        }
    }

    /// 丢弃未执行的排队项
    pub(crate) fn release_queued(&self, n: usize) {
        if n > 0 {
            self.activity
                .send_modify(|a| a.queued = a.queued.saturating_sub(n));
        }
    }

    /// 等待所有进行中与排队中的抓取结束
    pub async fn wait_idle(&self) {
        let mut rx = self.activity.subscribe();
        // 发送端归 self 所有，等待期间不会关闭
        let _ = rx.wait_for(Activity::is_idle).await;
    }
}

/// 进行中计数守卫，任何退出路径都会递减
#[must_use = "dropping the guard ends the operation immediately"]
pub struct InFlightGuard {
    state: Arc<DiscoveryState>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.state.decrement_in_flight();
    }
}

/// 任一关系列表中的账号数量严格超过阈值
///
/// 两个列表都只统计账号：粉丝列表里的非账号实体同样不计入，
/// 不按原始列表长度计算，这样阈值只反映能成为节点的账号数量
fn exceeds_threshold(relations: &FollowRelations, threshold: usize) -> bool {
    let accounts = |list: &[AccountRef]| list.iter().filter(|r| r.is_account()).count();
    accounts(&relations.followers) > threshold || accounts(&relations.following) > threshold
}

/// 归一化后的账号 ID，非账号实体返回 `None`
pub(crate) fn account_id_of(raw: &str) -> Option<String> {
    EntityId::parse(raw)?.account_id().map(str::to_string)
}
