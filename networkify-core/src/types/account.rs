//! 账号记录模型

use std::fmt;

use serde::{Deserialize, Serialize};

use networkify_provider::{normalize_account_id, AccountRef, FollowRelations};

/// 抓取状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlState {
    #[default]
    NotSearched,
    Searching,
    Searched,
    Error,
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotSearched => "not_searched",
            Self::Searching => "searching",
            Self::Searched => "searched",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// 单个账号的持久化记录
///
/// 不变量：
/// - `crawl_state == Error` 当且仅当 `error_detail` 有值
/// - `followers` / `following` 只在进入 `Searched` 时一起写入
/// - `excluded_from_graph` 只影响建图，不影响抓取
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    /// 账号 ID（主键）
    #[serde(alias = "username")]
    pub id: String,
    /// 显示名称
    #[serde(alias = "name")]
    pub display_name: String,
    /// 头像地址
    #[serde(default, alias = "image_url", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// 抓取状态
    #[serde(default, alias = "searchState")]
    pub crawl_state: CrawlState,
    /// 错误信息（仅 `Error` 状态）
    #[serde(default, alias = "error", skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    /// 最近一次成功抓取的粉丝列表
    #[serde(default)]
    pub followers: Vec<AccountRef>,
    /// 最近一次成功抓取的关注列表
    #[serde(default)]
    pub following: Vec<AccountRef>,
    /// 是否从图中排除
    #[serde(default, alias = "exclude_from_graph")]
    pub excluded_from_graph: bool,
}

impl AccountRecord {
    /// 由账号引用创建未抓取的记录
    pub fn new_unsearched(reference: &AccountRef) -> Self {
        Self {
            id: normalize_account_id(&reference.id),
            display_name: reference.display_name.clone(),
            avatar_url: reference.avatar_url.clone(),
            crawl_state: CrawlState::NotSearched,
            error_detail: None,
            followers: Vec::new(),
            following: Vec::new(),
            excluded_from_graph: false,
        }
    }

    #[must_use]
    pub fn excluded(mut self, excluded: bool) -> Self {
        self.excluded_from_graph = excluded;
        self
    }

    /// 已记录的关系总数
    pub fn relation_count(&self) -> usize {
        self.followers.len() + self.following.len()
    }

    /// 修正外部来源（导入、存档）的记录，使其满足不变量
    ///
    /// 返回是否做了修改
    pub(crate) fn normalize(&mut self) -> bool {
        let mut changed = false;

        let id = normalize_account_id(&self.id);
        if id != self.id {
            self.id = id;
            changed = true;
        }

        // 导出时仍在抓取中的记录无法继续，回到未抓取
        if self.crawl_state == CrawlState::Searching {
            self.crawl_state = CrawlState::NotSearched;
            changed = true;
        }

        match (self.crawl_state, self.error_detail.is_some()) {
            (CrawlState::Error, false) => {
                self.error_detail = Some("unknown error".to_string());
                changed = true;
            }
            (CrawlState::NotSearched | CrawlState::Searched | CrawlState::Searching, true) => {
                self.error_detail = None;
                changed = true;
            }
            _ => {}
        }

        changed
    }
}

/// 对记录的部分更新
///
/// 只能通过构造函数创建，保证状态迁移满足不变量
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    crawl_state: Option<CrawlState>,
    error_detail: Option<String>,
    relations: Option<FollowRelations>,
    excluded_from_graph: Option<bool>,
}

impl RecordPatch {
    /// 进入 `Searching`
    pub fn searching() -> Self {
        Self {
            crawl_state: Some(CrawlState::Searching),
            ..Self::default()
        }
    }

    /// 进入 `Searched`，同时写入两个关系列表
    pub fn searched(relations: FollowRelations) -> Self {
        Self {
            crawl_state: Some(CrawlState::Searched),
            relations: Some(relations),
            ..Self::default()
        }
    }

    /// 进入 `Error`
    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            crawl_state: Some(CrawlState::Error),
            error_detail: Some(detail.into()),
            ..Self::default()
        }
    }

    /// 设置排除标记
    pub fn excluded(excluded: bool) -> Self {
        Self {
            excluded_from_graph: Some(excluded),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, record: &mut AccountRecord) {
        if let Some(state) = self.crawl_state {
            record.crawl_state = state;
            record.error_detail = match state {
                CrawlState::Error => Some(
                    self.error_detail
                        .unwrap_or_else(|| "unknown error".to_string()),
                ),
                _ => None,
            };
            if let (CrawlState::Searched, Some(relations)) = (state, self.relations) {
                record.followers = relations.followers;
                record.following = relations.following;
            }
        }
        if let Some(excluded) = self.excluded_from_graph {
            record.excluded_from_graph = excluded;
        }
    }
}
