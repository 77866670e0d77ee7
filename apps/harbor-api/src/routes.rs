//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 健康检查：/health
//! - 门锁登记：/sites/{id}/locks/*
//! - 命令与刷新：/sites/{id}/locks/{did}/commands, /refresh, /manual-correction
//! - 门禁日志：/sites/{id}/access-logs
//! - 厂商凭证与告警：/sites/{id}/lock-credentials, /sites/{id}/lock-alerts

use crate::AppState;
use crate::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

/// 创建 API 路由
///
/// 返回包含所有 API 端点的 Router，由 `build_app` 同时挂载到 / 和 /api/ 前缀
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/sites/:site_id/locks", get(list_locks).post(create_lock))
        // 静态段优先于 :device_id 匹配
        .route("/sites/:site_id/locks/refresh", post(refresh_site_locks))
        .route(
            "/sites/:site_id/locks/:device_id",
            get(get_lock).put(update_lock).delete(delete_lock),
        )
        .route(
            "/sites/:site_id/locks/:device_id/commands",
            post(issue_lock_command),
        )
        .route("/sites/:site_id/locks/:device_id/refresh", post(refresh_lock))
        .route(
            "/sites/:site_id/locks/:device_id/manual-correction",
            post(manual_correction),
        )
        .route("/sites/:site_id/locks/:device_id/activity", get(last_activity))
        .route("/sites/:site_id/access-logs", get(list_access_logs))
        .route(
            "/sites/:site_id/lock-credentials",
            get(list_credentials).put(upsert_credentials),
        )
        .route("/sites/:site_id/lock-alerts", get(list_lock_alerts))
}
