//! Networkify 核心库
//!
//! 增量抓取关注关系并投影为可渲染的图：
//!
//! - [`state::DiscoveryState`]：账号记录集合，唯一数据源
//! - [`services::DiscoveryEngine`]：调用 Provider 抓取并整合结果
//! - [`services::GraphProjector`]：由记录集合生成节点和边
//! - [`services::SnapshotService`]：导入导出与命名存档
//!
//! 平台层（如 actix-web 后端）通过 [`services::ServiceContext`] 组装各服务，
//! 并提供 [`traits::SaveRepository`] 的持久化实现。

pub mod adapters;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;

pub use config::DiscoveryConfig;
pub use error::{CoreError, CoreResult};
pub use services::{
    AccountRecordService, CredentialService, DiscoveryEngine, GraphProjector,
    ProviderMetadataService, ServiceContext, SnapshotService,
};
pub use state::{Activity, DiscoveryState};
