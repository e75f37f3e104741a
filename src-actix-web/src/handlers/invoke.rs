//! RPC 风格的统一调用入口
//!
//! 所有前端请求都通过 POST /api/invoke 进行

use actix_web::{web, HttpResponse, ResponseError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResponse};
use crate::state::AppState;

use super::{credential, discovery, records, snapshot};

/// RPC 请求
#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    pub command: String,
    #[serde(default)]
    pub args: Value,
}

/// 统一调用入口
pub async fn invoke_handler(
    state: web::Data<AppState>,
    req: web::Json<InvokeRequest>,
) -> HttpResponse {
    let InvokeRequest { command, args } = req.into_inner();
    tracing::debug!("收到 RPC 请求: {command}");

    match dispatch_command(&state, &command, args).await {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => {
            tracing::error!("命令 {command} 执行失败: {e}");
            e.error_response()
        }
    }
}

/// 可省略参数的命令，`args` 为空时使用默认值
fn optional_args<T: DeserializeOwned + Default>(args: Value) -> Result<T, ApiError> {
    if args.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(args)?)
}

fn success<T: Serialize>(data: T) -> Result<Value, ApiError> {
    Ok(serde_json::to_value(ApiResponse::success(data))?)
}

/// 命令分发
async fn dispatch_command(state: &AppState, command: &str, args: Value) -> Result<Value, ApiError> {
    match command {
        // Credential commands
        "set_token" => {
            let req: credential::SetTokenArgs = serde_json::from_value(args)?;
            success(credential::set_token(state, req).await?)
        }
        "clear_token" => {
            credential::clear_token(state);
            success(())
        }
        "list_providers" => success(credential::list_providers(state)),

        // Discovery commands
        "seed_current_account" => success(discovery::seed_current_account(state).await?),
        "discover" => {
            let req: discovery::DiscoverArgs = serde_json::from_value(args)?;
            success(discovery::discover(state, req).await)
        }
        "discover_unsearched" => {
            let req: discovery::BulkDiscoverArgs = optional_args(args)?;
            success(discovery::discover_unsearched(state, req).await)
        }
        "rerun_errored" => {
            let req: discovery::BulkDiscoverArgs = optional_args(args)?;
            success(discovery::rerun_errored(state, req).await)
        }
        "discover_without_relations" => {
            let req: discovery::BulkDiscoverArgs = optional_args(args)?;
            success(discovery::discover_without_relations(state, req).await)
        }
        "wait_idle" => {
            let req: discovery::WaitIdleArgs = optional_args(args)?;
            success(discovery::wait_idle(state, req).await)
        }
        "status" => success(discovery::status(state)),
        "get_graph" => success(discovery::get_graph(state)),

        // Record commands
        "list_records" => success(records::list_records(state)),
        "get_record" => {
            let req: records::GetRecordArgs = serde_json::from_value(args)?;
            success(records::get_record(state, &req)?)
        }
        "search_records" => {
            let req: records::SearchRecordsArgs = serde_json::from_value(args)?;
            success(records::search_records(state, &req))
        }
        "set_excluded" => {
            let req: records::SetExcludedArgs = serde_json::from_value(args)?;
            success(records::set_excluded(state, &req)?)
        }
        "clear_all" => {
            records::clear_all(state);
            success(())
        }

        // Snapshot commands
        "export_snapshot" => success(snapshot::export_snapshot(state)?),
        "import_snapshot" => {
            let req: snapshot::ImportSnapshotArgs = serde_json::from_value(args)?;
            success(snapshot::import_snapshot(state, &req)?)
        }
        "create_save" => {
            let req: snapshot::CreateSaveArgs = serde_json::from_value(args)?;
            success(snapshot::create_save(state, &req).await?)
        }
        "list_saves" => success(snapshot::list_saves(state).await?),
        "load_save" => {
            let req: snapshot::SaveIdArgs = serde_json::from_value(args)?;
            success(snapshot::load_save(state, &req).await?)
        }
        "delete_save" => {
            let req: snapshot::SaveIdArgs = serde_json::from_value(args)?;
            snapshot::delete_save(state, &req).await?;
            success(())
        }

        // 不支持的命令
        _ => Err(ApiError::UnknownCommand(command.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use actix_web::{test, App};
    use async_trait::async_trait;
    use serde_json::json;

    use networkify_core::adapters::InMemorySaveRepository;
    use networkify_core::types::{AccountRef, FollowRelations, ProviderType};
    use networkify_core::{DiscoveryConfig, ServiceContext};
    use networkify_provider::{FollowGraphProvider, ProviderError};

    use super::*;

    struct StubProvider {
        relations: HashMap<String, FollowRelations>,
    }

    #[async_trait]
    impl FollowGraphProvider for StubProvider {
        fn id(&self) -> ProviderType {
            ProviderType::Spotify
        }

        async fn fetch_current_account(&self) -> networkify_provider::Result<AccountRef> {
            Ok(AccountRef::new("me", "Me"))
        }

        async fn fetch_follow_relations(
            &self,
            account_id: &str,
        ) -> networkify_provider::Result<FollowRelations> {
            if account_id == "broken" {
                return Err(ProviderError::NetworkError {
                    provider: "spotify".to_string(),
                    detail: "connection reset".to_string(),
                });
            }
            Ok(self.relations.get(account_id).cloned().unwrap_or_default())
        }
    }

    fn app_state() -> AppState {
        let ctx = ServiceContext::new(
            DiscoveryConfig::default(),
            Arc::new(InMemorySaveRepository::new()),
        );
        AppState::new(ctx)
    }

    fn with_stub(state: &AppState) {
        let mut relations = HashMap::new();
        relations.insert(
            "me".to_string(),
            FollowRelations {
                followers: vec![AccountRef::new("x", "X")],
                following: vec![AccountRef::new("y", "Y")],
            },
        );
        state
            .credentials
            .set_provider(Arc::new(StubProvider { relations }));
    }

    async fn call(state: &AppState, command: &str, args: Value) -> (u16, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .route("/api/invoke", web::post().to(invoke_handler)),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/invoke")
            .set_json(json!({ "command": command, "args": args }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status().as_u16();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn unknown_command_is_bad_request() {
        let state = app_state();
        let (status, body) = call(&state, "frobnicate", Value::Null).await;
        assert_eq!(status, 400);
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn seed_without_token_is_unauthorized() {
        let state = app_state();
        let (status, _) = call(&state, "seed_current_account", Value::Null).await;
        assert_eq!(status, 401);
    }

    #[actix_web::test]
    async fn discover_then_graph() {
        let state = app_state();
        with_stub(&state);

        let (status, body) = call(&state, "seed_current_account", Value::Null).await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["id"], "me");

        let (_, body) = call(&state, "discover", json!({ "accountId": "me" })).await;
        assert_eq!(body["data"]["status"], "searched");

        let (_, body) = call(&state, "wait_idle", json!({ "timeoutMs": 1000 })).await;
        assert_eq!(body["data"]["settled"], true);
        let nodes = body["data"]["graph"]["nodes"].as_array().unwrap();
        let edges = body["data"]["graph"]["edges"].as_array().unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(edges.len(), 2);

        let (_, body) = call(&state, "status", Value::Null).await;
        assert_eq!(body["data"]["hasCredentials"], true);
        assert_eq!(body["data"]["summary"]["total"], 3);
    }

    #[actix_web::test]
    async fn crawl_failure_is_reported_in_outcome() {
        let state = app_state();
        with_stub(&state);

        let (status, body) = call(&state, "discover", json!({ "accountId": "broken" })).await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["status"], "failed");
        assert_eq!(body["data"]["kind"], "network");
    }

    #[actix_web::test]
    async fn bulk_commands_accept_missing_args() {
        let state = app_state();
        with_stub(&state);
        call(&state, "seed_current_account", Value::Null).await;

        let (status, body) = call(&state, "discover_unsearched", Value::Null).await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["searched"], 1);
    }

    #[actix_web::test]
    async fn missing_record_is_not_found() {
        let state = app_state();
        let (status, _) = call(&state, "get_record", json!({ "accountId": "ghost" })).await;
        assert_eq!(status, 404);

        let (status, _) = call(
            &state,
            "set_excluded",
            json!({ "accountId": "ghost", "excluded": true }),
        )
        .await;
        assert_eq!(status, 404);
    }

    #[actix_web::test]
    async fn saves_round_trip_through_commands() {
        let state = app_state();
        with_stub(&state);
        call(&state, "seed_current_account", Value::Null).await;

        let (_, body) = call(&state, "create_save", json!({ "name": "first" })).await;
        let save_id = body["data"]["id"].as_str().unwrap().to_string();

        call(&state, "clear_all", Value::Null).await;
        let (_, body) = call(&state, "list_records", Value::Null).await;
        assert!(body["data"].as_array().unwrap().is_empty());

        let (_, body) = call(&state, "load_save", json!({ "saveId": save_id })).await;
        assert_eq!(body["data"]["recordCount"], 1);

        let (status, _) = call(&state, "create_save", json!({ "name": "  " })).await;
        assert_eq!(status, 400);
    }

    #[actix_web::test]
    async fn invalid_import_is_bad_request() {
        let state = app_state();
        let (status, _) = call(&state, "import_snapshot", json!({ "content": "nope" })).await;
        assert_eq!(status, 400);
    }
}
