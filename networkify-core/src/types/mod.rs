//! 核心类型定义

mod account;
mod discovery;
mod graph;
mod snapshot;

pub use account::{AccountRecord, CrawlState, RecordPatch};
pub use discovery::{
    BulkDiscoveryReport, CrawlSummary, DiscoverOptions, DiscoveryOutcome, SkipReason,
};
pub use graph::{Edge, Graph, GraphStats, Node, NodeFill, FOLLOWING_LABEL};
pub use snapshot::{ImportResult, NamedSave, SaveSummary, SnapshotData, SnapshotExport};

// ============ Re-export Provider 类型 ============

pub use networkify_provider::{
    AccountRef, EntityId, ErrorKind, FollowRelations, ProviderCredentials, ProviderMetadata,
    ProviderType,
};
