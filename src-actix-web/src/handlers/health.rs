//! 健康检查

use actix_web::HttpResponse;
use chrono::Utc;
use serde_json::json;

pub async fn health_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
