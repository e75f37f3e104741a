//! 命名存档持久化抽象 Trait

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CoreResult;
use crate::types::NamedSave;

/// 命名存档仓库 Trait
///
/// 平台实现:
/// - 内存: `InMemorySaveRepository`
/// - Actix-Web: `JsonFileSaveRepository` (JSON 文件)
#[async_trait]
pub trait SaveRepository: Send + Sync {
    /// 获取所有存档（按插入顺序）
    ///
    /// 返回 Arc<Vec> 以避免不必要的 clone
    async fn find_all(&self) -> CoreResult<Arc<Vec<NamedSave>>>;

    /// 根据 ID 获取存档
    ///
    /// # Arguments
    /// * `id` - 存档 ID
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<NamedSave>>;

    /// 新增存档
    ///
    /// # Arguments
    /// * `save` - 存档数据
    async fn insert(&self, save: &NamedSave) -> CoreResult<()>;

    /// 删除存档，不存在时返回 `SaveNotFound`
    ///
    /// # Arguments
    /// * `id` - 存档 ID
    async fn delete(&self, id: &str) -> CoreResult<()>;
}
