//! 快照（导入导出 / 命名存档）相关类型定义

use serde::{Deserialize, Serialize};

use super::AccountRecord;

/// 快照数据，导出文件的完整内容
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotData {
    /// 全部账号记录
    pub users: Vec<AccountRecord>,
}

/// 导出响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotExport {
    /// 导出的 JSON 内容
    pub content: String,
    /// 建议的文件名
    pub suggested_filename: String,
    /// 导出的记录数量
    pub record_count: usize,
}

/// 导入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    /// 导入后的记录数量
    pub record_count: usize,
    /// 因 ID 重复被丢弃的记录数量
    pub duplicate_count: usize,
    /// 被修正（状态 / 错误信息 / ID 前缀）的记录数量
    pub repaired_count: usize,
}

/// 命名存档
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedSave {
    /// 存档 ID
    pub id: String,
    /// 存档名称
    pub name: String,
    /// 创建时间（Unix 毫秒）
    pub timestamp: i64,
    /// 快照数据
    pub data: SnapshotData,
}

/// 存档列表项（不含数据本体）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSummary {
    pub id: String,
    pub name: String,
    pub timestamp: i64,
    pub record_count: usize,
}

impl From<&NamedSave> for SaveSummary {
    fn from(save: &NamedSave) -> Self {
        Self {
            id: save.id.clone(),
            name: save.name.clone(),
            timestamp: save.timestamp,
            record_count: save.data.users.len(),
        }
    }
}
