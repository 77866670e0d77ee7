//! 门锁命令 handlers
//!
//! - POST /sites/{id}/locks/{did}/commands - 下发命令 `{action}`
//! - POST /sites/{id}/locks/{did}/refresh - 刷新单台门锁状态
//! - POST /sites/{id}/locks/refresh - 刷新站点全部生效门锁
//! - POST /sites/{id}/locks/{did}/manual-correction - 人工纠正 `{state}`
//! - GET /sites/{id}/locks/{did}/activity - 最近一条门禁日志
//!
//! 厂商失败以 `success=false` + 结果体返回，见 `command_response`。

use super::{LockPath, SitePath};
use crate::AppState;
use crate::middleware::{require_permission, require_site_scope};
use crate::utils::response::{access_log_to_dto, command_response, control_error, sweep_to_dto};
use crate::utils::{parse_action, parse_lock_state};
use api_contract::{ApiResponse, CommandRequest, ManualCorrectionRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::{LockAction, permissions};

/// 各命令所需权限码
fn action_permission(action: LockAction) -> &'static str {
    match action {
        LockAction::Lock | LockAction::Unlock => permissions::LOCK_COMMAND_ISSUE,
        LockAction::Status | LockAction::Diagnostics => permissions::LOCK_STATUS_REFRESH,
        LockAction::ProvisionKey => permissions::LOCK_KEY_PROVISION,
    }
}

pub async fn issue_lock_command(
    State(state): State<AppState>,
    Path(path): Path<LockPath>,
    headers: HeaderMap,
    Json(req): Json<CommandRequest>,
) -> Response {
    let ctx = match require_site_scope(&state, &headers, &path.site_id).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let action = match parse_action(&req.action) {
        Ok(action) => action,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&ctx, action_permission(action)) {
        return response;
    }
    match state
        .orchestrator
        .issue_command(&ctx, &path.site_id, &path.device_id, action)
        .await
    {
        Ok(result) => command_response(result),
        Err(err) => control_error(err),
    }
}

pub async fn refresh_lock(
    State(state): State<AppState>,
    Path(path): Path<LockPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_site_scope(&state, &headers, &path.site_id).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&ctx, permissions::LOCK_STATUS_REFRESH) {
        return response;
    }
    match state
        .orchestrator
        .refresh_status(&ctx, &path.site_id, &path.device_id)
        .await
    {
        Ok(result) => command_response(result),
        Err(err) => control_error(err),
    }
}

/// 站点批量刷新：单台失败体现在 `failed` 列表中，整体仍返回 200
pub async fn refresh_site_locks(
    State(state): State<AppState>,
    Path(path): Path<SitePath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_site_scope(&state, &headers, &path.site_id).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&ctx, permissions::LOCK_STATUS_REFRESH) {
        return response;
    }
    match state.orchestrator.refresh_all(&ctx, &path.site_id).await {
        Ok(report) => {
            (StatusCode::OK, Json(ApiResponse::success(sweep_to_dto(report)))).into_response()
        }
        Err(err) => control_error(err),
    }
}

pub async fn manual_correction(
    State(state): State<AppState>,
    Path(path): Path<LockPath>,
    headers: HeaderMap,
    Json(req): Json<ManualCorrectionRequest>,
) -> Response {
    let ctx = match require_site_scope(&state, &headers, &path.site_id).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&ctx, permissions::LOCK_MANUAL_CORRECTION) {
        return response;
    }
    let lock_state = match parse_lock_state(&req.state) {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state
        .orchestrator
        .manual_correction(&ctx, &path.site_id, &path.device_id, lock_state)
        .await
    {
        Ok(result) => command_response(result),
        Err(err) => control_error(err),
    }
}

/// 无日志时 `data` 为 null
pub async fn last_activity(
    State(state): State<AppState>,
    Path(path): Path<LockPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_site_scope(&state, &headers, &path.site_id).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&ctx, permissions::LOCK_ACCESS_LOG_READ) {
        return response;
    }
    match state
        .orchestrator
        .last_activity(&ctx, &path.site_id, &path.device_id)
        .await
    {
        Ok(item) => {
            let data = item.map(access_log_to_dto);
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => control_error(err),
    }
}
