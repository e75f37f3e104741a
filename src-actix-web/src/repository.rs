//! JSON 文件存档仓库
//!
//! 所有命名存档保存在单个 JSON 文件中，写入时整体覆盖

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use networkify_core::error::{CoreError, CoreResult};
use networkify_core::traits::SaveRepository;
use networkify_core::types::NamedSave;

/// JSON 文件存档仓库实现
pub struct JsonFileSaveRepository {
    path: PathBuf,
    /// 内存缓存，使用 Arc<Vec> 避免频繁 clone 整个列表
    cache: RwLock<Option<Arc<Vec<NamedSave>>>>,
}

impl JsonFileSaveRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 从文件加载存档，文件不存在时视为空列表
    async fn load_from_file(&self) -> CoreResult<Vec<NamedSave>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CoreError::StorageError(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// 写入文件（先写临时文件再重命名）
    async fn save_to_file(&self, saves: &[NamedSave]) -> CoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::StorageError(format!("Failed to create directory: {e}")))?;
        }

        let content = serde_json::to_string_pretty(saves)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to write saves: {e}")))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to replace saves: {e}")))?;

        tracing::debug!("已写入 {} 个存档到 {}", saves.len(), self.path.display());
        Ok(())
    }

    /// 在持有写锁期间完成读取、修改、落盘和更新缓存
    ///
    /// 所有写入者因此串行执行，也不会争用同一个临时文件
    async fn mutate<R>(
        &self,
        apply: impl FnOnce(&mut Vec<NamedSave>) -> CoreResult<R>,
    ) -> CoreResult<R> {
        let mut cache = self.cache.write().await;
        let mut saves = match cache.as_ref() {
            Some(saves) => (**saves).clone(),
            None => self.load_from_file().await?,
        };
        let result = apply(&mut saves)?;
        self.save_to_file(&saves).await?;
        *cache = Some(Arc::new(saves));
        Ok(result)
    }
}

#[async_trait]
impl SaveRepository for JsonFileSaveRepository {
    async fn find_all(&self) -> CoreResult<Arc<Vec<NamedSave>>> {
        if let Some(saves) = self.cache.read().await.as_ref() {
            return Ok(Arc::clone(saves));
        }

        let mut cache = self.cache.write().await;
        if let Some(saves) = cache.as_ref() {
            return Ok(Arc::clone(saves));
        }
        let saves = Arc::new(self.load_from_file().await?);
        *cache = Some(Arc::clone(&saves));
        Ok(saves)
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<NamedSave>> {
        let saves = self.find_all().await?;
        Ok(saves.iter().find(|s| s.id == id).cloned())
    }

    async fn insert(&self, save: &NamedSave) -> CoreResult<()> {
        self.mutate(|saves| {
            match saves.iter().position(|s| s.id == save.id) {
                Some(pos) => saves[pos] = save.clone(),
                None => saves.push(save.clone()),
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        self.mutate(|saves| {
            let initial_len = saves.len();
            saves.retain(|s| s.id != id);
            if saves.len() == initial_len {
                return Err(CoreError::SaveNotFound(id.to_string()));
            }
            Ok(())
        })
        .await?;
        tracing::info!("已删除存档 {id}");
        Ok(())
    }
}
