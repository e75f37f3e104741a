//! 快照与命名存档集成测试

mod common;

use std::sync::Arc;

use common::{Harness, StubProvider};
use networkify_core::types::{CrawlState, SnapshotData};
use networkify_core::{CoreError, SnapshotService};

#[tokio::test]
async fn export_then_import_restores_collection() {
    let h = Harness::new(StubProvider::new().relations("me", &["x", "y"], &[]));
    h.seed(&["me"]);
    h.engine.discover("me", Default::default()).await;

    let service = SnapshotService::new(Arc::clone(&h.ctx));
    let export = service.export_snapshot().unwrap();
    assert_eq!(export.record_count, 3);
    assert!(export.suggested_filename.starts_with("networkify-"));
    assert!(export.suggested_filename.ends_with(".json"));

    h.engine.clear_all();
    assert!(h.ctx.state.is_empty());

    let result = service.import_snapshot(&export.content).unwrap();
    assert_eq!(result.record_count, 3);
    assert_eq!(result.duplicate_count, 0);
    assert_eq!(h.ctx.state.get("me").unwrap().following.len(), 2);
}

#[tokio::test]
async fn import_repairs_legacy_documents() {
    let h = Harness::new(StubProvider::new());
    h.seed(&["existing"]);
    let service = SnapshotService::new(Arc::clone(&h.ctx));

    let legacy = r#"{"users": [
        {"username": "spotify:user:amy", "name": "Amy", "searchState": "searching",
         "followers": [], "following": [], "exclude_from_graph": false},
        {"username": "amy", "name": "Amy again", "searchState": "searched",
         "followers": [], "following": [], "exclude_from_graph": true},
        {"username": "bob", "name": "Bob", "searchState": "error",
         "followers": [], "following": [], "exclude_from_graph": false}
    ]}"#;

    let result = service.import_snapshot(legacy).unwrap();
    assert_eq!(result.record_count, 2);
    assert_eq!(result.duplicate_count, 1);
    assert!(result.repaired_count >= 2);

    assert!(h.ctx.state.get("existing").is_none(), "import replaces");
    let amy = h.ctx.state.get("amy").unwrap();
    assert_eq!(amy.display_name, "Amy");
    assert_eq!(amy.crawl_state, CrawlState::NotSearched);
    let bob = h.ctx.state.get("bob").unwrap();
    assert!(bob.error_detail.is_some());
}

#[tokio::test]
async fn invalid_import_leaves_collection_untouched() {
    let h = Harness::new(StubProvider::new());
    h.seed(&["keep"]);
    let service = SnapshotService::new(Arc::clone(&h.ctx));

    let err = service.import_snapshot("not json").unwrap_err();
    assert!(matches!(err, CoreError::ImportExportError(_)));
    assert!(h.ctx.state.contains("keep"));
}

#[tokio::test]
async fn named_saves_round_trip_newest_first() {
    let h = Harness::new(StubProvider::new());
    let service = SnapshotService::new(Arc::clone(&h.ctx));

    h.seed(&["a"]);
    let first = service.create_save("first").await.unwrap();
    h.seed(&["b"]);
    let second = service.create_save("second").await.unwrap();
    assert_eq!(second.record_count, 2);

    let listed: Vec<_> = service
        .list_saves()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(listed, vec!["second", "first"]);

    service.load_save(&first.id).await.unwrap();
    let ids: Vec<_> = h.ctx.state.records().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["a"]);

    service.delete_save(&first.id).await.unwrap();
    assert!(matches!(
        service.load_save(&first.id).await,
        Err(CoreError::SaveNotFound(_))
    ));
    assert!(matches!(
        service.create_save("   ").await,
        Err(CoreError::ValidationError(_))
    ));
}

#[test]
fn snapshot_document_shape() {
    let json = serde_json::to_value(SnapshotData::default()).unwrap();
    assert_eq!(json, serde_json::json!({ "users": [] }));
}
