//! 账号记录服务
//!
//! 记录的查询和手动排除，不涉及抓取

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{AccountRecord, CrawlState, CrawlSummary, RecordPatch};

/// 账号记录服务
pub struct AccountRecordService {
    ctx: Arc<ServiceContext>,
}

impl AccountRecordService {
    /// 创建账号记录服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 列出所有记录（按发现顺序）
    pub fn list_records(&self) -> Vec<AccountRecord> {
        self.ctx.state.records()
    }

    /// 根据 ID 获取记录
    pub fn get_record(&self, account_id: &str) -> CoreResult<AccountRecord> {
        self.ctx
            .state
            .get(account_id)
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))
    }

    /// 设置是否从图中排除，返回更新后的记录
    pub fn set_excluded(&self, account_id: &str, excluded: bool) -> CoreResult<AccountRecord> {
        if !self
            .ctx
            .state
            .patch(account_id, RecordPatch::excluded(excluded))
        {
            return Err(CoreError::AccountNotFound(account_id.to_string()));
        }
        log::info!("Set excluded_from_graph={excluded} on {account_id}");
        self.get_record(account_id)
    }

    /// 按显示名称或 ID 搜索（忽略大小写，保持集合顺序）
    pub fn search(&self, query: &str) -> Vec<AccountRecord> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.ctx
            .state
            .records()
            .into_iter()
            .filter(|r| {
                r.display_name.to_lowercase().contains(&query)
                    || r.id.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// 各状态的记录数量
    pub fn crawl_summary(&self) -> CrawlSummary {
        let records = self.ctx.state.records();
        let mut summary = CrawlSummary {
            total: records.len(),
            ..CrawlSummary::default()
        };
        for record in &records {
            match record.crawl_state {
                CrawlState::NotSearched => summary.not_searched += 1,
                CrawlState::Searching => summary.searching += 1,
                CrawlState::Searched => summary.searched += 1,
                CrawlState::Error => summary.error += 1,
            }
            if record.excluded_from_graph {
                summary.excluded += 1;
            }
        }
        summary
    }
}
