//! 快照与命名存档处理模块

use serde::Deserialize;

use networkify_core::types::{ImportResult, SaveSummary, SnapshotExport};

use crate::error::ApiError;
use crate::state::AppState;

// ============ 请求参数类型 ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSnapshotArgs {
    /// 导出文件的 JSON 内容
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaveArgs {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveIdArgs {
    pub save_id: String,
}

// ============ 处理函数 ============

pub fn export_snapshot(state: &AppState) -> Result<SnapshotExport, ApiError> {
    Ok(state.snapshots.export_snapshot()?)
}

/// 替换整个集合，导入前发起的抓取结果会被丢弃
pub fn import_snapshot(
    state: &AppState,
    args: &ImportSnapshotArgs,
) -> Result<ImportResult, ApiError> {
    Ok(state.snapshots.import_snapshot(&args.content)?)
}

pub async fn create_save(state: &AppState, args: &CreateSaveArgs) -> Result<SaveSummary, ApiError> {
    Ok(state.snapshots.create_save(&args.name).await?)
}

pub async fn list_saves(state: &AppState) -> Result<Vec<SaveSummary>, ApiError> {
    Ok(state.snapshots.list_saves().await?)
}

pub async fn load_save(state: &AppState, args: &SaveIdArgs) -> Result<ImportResult, ApiError> {
    Ok(state.snapshots.load_save(&args.save_id).await?)
}

pub async fn delete_save(state: &AppState, args: &SaveIdArgs) -> Result<(), ApiError> {
    state.snapshots.delete_save(&args.save_id).await?;
    Ok(())
}
