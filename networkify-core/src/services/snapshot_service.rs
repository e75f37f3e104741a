//! 快照服务
//!
//! 导出 / 导入整份记录集合，以及命名存档的增删查。
//! 导入和读档都是整体替换，不做合并

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{ImportResult, NamedSave, SaveSummary, SnapshotData, SnapshotExport};

/// 快照服务
pub struct SnapshotService {
    ctx: Arc<ServiceContext>,
}

impl SnapshotService {
    /// 创建快照服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 当前集合的快照数据
    pub fn snapshot(&self) -> SnapshotData {
        SnapshotData {
            users: self.ctx.state.records(),
        }
    }

    /// 导出为 JSON
    pub fn export_snapshot(&self) -> CoreResult<SnapshotExport> {
        let data = self.snapshot();
        let content = serde_json::to_string(&data)?;
        let suggested_filename = format!(
            "networkify-{}.json",
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
        );

        Ok(SnapshotExport {
            content,
            suggested_filename,
            record_count: data.users.len(),
        })
    }

    /// 从 JSON 导入，替换整个集合
    pub fn import_snapshot(&self, content: &str) -> CoreResult<ImportResult> {
        let data: SnapshotData = serde_json::from_str(content)
            .map_err(|e| CoreError::ImportExportError(format!("无效的导入文件: {e}")))?;
        Ok(self.replace_with(data))
    }

    fn replace_with(&self, data: SnapshotData) -> ImportResult {
        let (record_count, duplicate_count, repaired_count) =
            self.ctx.state.replace_all(data.users);
        log::info!(
            "Imported {record_count} record(s), {duplicate_count} duplicate(s) dropped, {repaired_count} repaired"
        );
        ImportResult {
            record_count,
            duplicate_count,
            repaired_count,
        }
    }

    // ============ 命名存档 ============

    /// 把当前集合保存为命名存档
    pub async fn create_save(&self, name: &str) -> CoreResult<SaveSummary> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::ValidationError("存档名称不能为空".to_string()));
        }

        let save = NamedSave {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            data: self.snapshot(),
        };
        self.ctx.save_repository.insert(&save).await?;
        log::info!("Created save {} ({})", save.id, save.name);
        Ok(SaveSummary::from(&save))
    }

    /// 列出所有存档，最新的在前
    pub async fn list_saves(&self) -> CoreResult<Vec<SaveSummary>> {
        let saves = self.ctx.save_repository.find_all().await?;
        let mut summaries: Vec<SaveSummary> = saves.iter().map(SaveSummary::from).collect();
        // 时间相同的存档保持后插入的在前
        summaries.reverse();
        summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(summaries)
    }

    /// 读取存档，替换整个集合
    pub async fn load_save(&self, save_id: &str) -> CoreResult<ImportResult> {
        let save = self
            .ctx
            .save_repository
            .find_by_id(save_id)
            .await?
            .ok_or_else(|| CoreError::SaveNotFound(save_id.to_string()))?;
        Ok(self.replace_with(save.data))
    }

    /// 删除存档
    pub async fn delete_save(&self, save_id: &str) -> CoreResult<()> {
        self.ctx.save_repository.delete(save_id).await?;
        log::info!("Deleted save {save_id}");
        Ok(())
    }
}
