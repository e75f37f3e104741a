//! 账号记录处理模块

use serde::Deserialize;

use networkify_core::types::AccountRecord;

use crate::error::ApiError;
use crate::state::AppState;

// ============ 请求参数类型 ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRecordArgs {
    pub account_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecordsArgs {
    pub query: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetExcludedArgs {
    pub account_id: String,
    pub excluded: bool,
}

// ============ 处理函数 ============

pub fn list_records(state: &AppState) -> Vec<AccountRecord> {
    state.records.list_records()
}

pub fn get_record(state: &AppState, args: &GetRecordArgs) -> Result<AccountRecord, ApiError> {
    Ok(state.records.get_record(&args.account_id)?)
}

pub fn search_records(state: &AppState, args: &SearchRecordsArgs) -> Vec<AccountRecord> {
    state.records.search(&args.query)
}

pub fn set_excluded(state: &AppState, args: &SetExcludedArgs) -> Result<AccountRecord, ApiError> {
    Ok(state.records.set_excluded(&args.account_id, args.excluded)?)
}

/// 清空全部记录，正在进行的抓取结果会被丢弃
pub fn clear_all(state: &AppState) {
    state.engine.clear_all();
    tracing::info!("已清空全部账号记录");
}
