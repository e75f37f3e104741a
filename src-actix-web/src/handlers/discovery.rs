//! 抓取处理模块

use std::time::Duration;

use serde::{Deserialize, Serialize};

use networkify_core::types::{
    AccountRecord, BulkDiscoveryReport, CrawlSummary, DiscoverOptions, DiscoveryOutcome, Graph,
};
use networkify_core::Activity;

use crate::error::ApiError;
use crate::state::AppState;

// ============ 请求参数类型 ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverArgs {
    pub account_id: String,
    /// 自动抓取新发现的账号
    #[serde(default)]
    pub auto_cascade: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDiscoverArgs {
    #[serde(default)]
    pub auto_cascade: bool,
}

impl BulkDiscoverArgs {
    fn options(&self) -> DiscoverOptions {
        DiscoverOptions {
            auto_cascade: self.auto_cascade,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitIdleArgs {
    /// 最长等待时间，不设置时一直等到空闲
    pub timeout_ms: Option<u64>,
}

// ============ 响应类型 ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitIdleResponse {
    /// 返回时引擎是否已空闲
    pub settled: bool,
    pub graph: Graph,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub activity: Activity,
    pub summary: CrawlSummary,
    pub has_credentials: bool,
}

// ============ 处理函数 ============

pub async fn seed_current_account(state: &AppState) -> Result<AccountRecord, ApiError> {
    Ok(state.engine.seed_current_account().await?)
}

pub async fn discover(state: &AppState, args: DiscoverArgs) -> DiscoveryOutcome {
    let options = DiscoverOptions {
        auto_cascade: args.auto_cascade,
    };
    state.engine.discover(&args.account_id, options).await
}

pub async fn discover_unsearched(state: &AppState, args: BulkDiscoverArgs) -> BulkDiscoveryReport {
    state.engine.discover_unsearched(args.options()).await
}

pub async fn rerun_errored(state: &AppState, args: BulkDiscoverArgs) -> BulkDiscoveryReport {
    state.engine.rerun_errored(args.options()).await
}

pub async fn discover_without_relations(
    state: &AppState,
    args: BulkDiscoverArgs,
) -> BulkDiscoveryReport {
    state.engine.discover_without_relations(args.options()).await
}

/// 等待全部抓取结束后返回图
pub async fn wait_idle(state: &AppState, args: WaitIdleArgs) -> WaitIdleResponse {
    let settled = match args.timeout_ms {
        Some(ms) => tokio::time::timeout(Duration::from_millis(ms), state.engine.wait_idle())
            .await
            .is_ok(),
        None => {
            state.engine.wait_idle().await;
            true
        }
    };

    WaitIdleResponse {
        settled,
        graph: state.engine.project_graph(),
    }
}

pub fn status(state: &AppState) -> StatusResponse {
    StatusResponse {
        activity: state.engine.activity(),
        summary: state.records.crawl_summary(),
        has_credentials: state.credentials.has_credentials(),
    }
}

pub fn get_graph(state: &AppState) -> Graph {
    state.engine.project_graph()
}
