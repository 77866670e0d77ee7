use super::SitePath;
use crate::AppState;
use crate::middleware::{require_permission, require_site_scope};
use crate::utils::response::alert_to_dto;
use api_contract::{ApiResponse, LockAlertDto};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::permissions;

/// 站点当前的厂商订阅过期提示
pub async fn list_lock_alerts(
    State(state): State<AppState>,
    Path(path): Path<SitePath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_site_scope(&state, &headers, &path.site_id).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&ctx, permissions::LOCK_DEVICE_READ) {
        return response;
    }
    let data: Vec<LockAlertDto> = state
        .orchestrator
        .subscription_alerts(&ctx, &path.site_id)
        .into_iter()
        .map(alert_to_dto)
        .collect();
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}
