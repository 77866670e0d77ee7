//! Harbor API：门锁管理与命令下发的 HTTP 接口。
//!
//! 路由同时挂载在 `/` 与 `/api/` 下，全部使用 Bearer JWT。

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod utils;

use axum::{Router, middleware as axum_middleware};
use harbor_auth::JwtManager;
use harbor_control::LockOrchestrator;
use harbor_storage::{AccessLogStore, CredentialStore, LockDeviceStore, SiteStore};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 所有 handler 共享的应用状态。
#[derive(Clone)]
pub struct AppState {
    pub auth: JwtManager,
    pub site_store: Arc<dyn SiteStore>,
    pub lock_store: Arc<dyn LockDeviceStore>,
    pub credential_store: Arc<dyn CredentialStore>,
    pub access_log_store: Arc<dyn AccessLogStore>,
    pub orchestrator: LockOrchestrator,
}

/// 组装完整路由（含请求追踪中间件）。
pub fn build_app(state: AppState) -> Router {
    let api = routes::create_api_router();
    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::request_context))
}
