//! 内存存档仓库
//!
//! 进程退出即丢失，用于测试和不需要落盘的场景

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::traits::SaveRepository;
use crate::types::NamedSave;

/// 内存存档仓库
#[derive(Debug, Default)]
pub struct InMemorySaveRepository {
    /// 写时整体替换，读取只 clone Arc 指针
    saves: RwLock<Arc<Vec<NamedSave>>>,
}

impl InMemorySaveRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SaveRepository for InMemorySaveRepository {
    async fn find_all(&self) -> CoreResult<Arc<Vec<NamedSave>>> {
        Ok(Arc::clone(&*self.saves.read().await))
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<NamedSave>> {
        let saves = self.find_all().await?;
        Ok(saves.iter().find(|s| s.id == id).cloned())
    }

    async fn insert(&self, save: &NamedSave) -> CoreResult<()> {
        let mut saves = self.saves.write().await;
        let mut next = (**saves).clone();
        match next.iter().position(|s| s.id == save.id) {
            Some(pos) => next[pos] = save.clone(),
            None => next.push(save.clone()),
        }
        *saves = Arc::new(next);
        Ok(())
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        let mut saves = self.saves.write().await;
        let mut next = (**saves).clone();
        let initial_len = next.len();
        next.retain(|s| s.id != id);
        if next.len() == initial_len {
            return Err(CoreError::SaveNotFound(id.to_string()));
        }
        *saves = Arc::new(next);
        Ok(())
    }
}
