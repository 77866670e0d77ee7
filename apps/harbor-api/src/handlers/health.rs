use axum::{Json, response::IntoResponse};

/// 健康检查（无需认证）
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
