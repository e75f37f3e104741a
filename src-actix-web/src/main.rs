//! Networkify Web 后端
//!
//! 基于 Actix-web 的 RPC 服务，封装关注关系抓取与图投影

mod config;
mod error;
mod handlers;
mod logging;
mod repository;
mod state;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};

use networkify_core::ServiceContext;

use config::AppConfig;
use repository::JsonFileSaveRepository;
use state::AppState;

/// 配置路由
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/invoke", web::post().to(handlers::invoke::invoke_handler))
            .route("/health", web::get().to(handlers::health::health_handler)),
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置
    let config = AppConfig::load()?;

    // 初始化日志，guard 需要持有到进程退出
    let _log_guard = logging::init(&config.logging)?;
    tracing::info!("Networkify Web 后端启动中...");

    // 创建应用状态
    let repository = JsonFileSaveRepository::new(&config.storage.saves_path);
    tracing::info!("存档文件: {}", repository.path().display());
    let ctx = ServiceContext::new(config.discovery.clone(), Arc::new(repository));
    let state = AppState::new(ctx);

    // 启动服务器
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let workers = config.worker_count();

    tracing::info!("服务器启动于 http://{} (workers: {})", bind_addr, workers);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
