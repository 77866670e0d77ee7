//! 门锁登记 CRUD handlers
//!
//! 提供门锁资源的增删改查接口：
//! - GET /sites/{id}/locks - 列出门锁（含停用设备）
//! - POST /sites/{id}/locks - 登记门锁
//! - GET /sites/{id}/locks/{did} - 获取门锁详情
//! - PUT /sites/{id}/locks/{did} - 更新描述字段
//! - DELETE /sites/{id}/locks/{did} - 删除门锁（有日志历史时改为停用）
//!
//! 权限要求：
//! - 所有接口需要 Bearer token 认证
//! - 需验证站点归属当前租户
//! - 锁状态与遥测字段只能经命令/刷新/人工纠正写入，这里不接受

use super::{LockPath, SitePath};
use crate::AppState;
use crate::middleware::{require_permission, require_site_scope};
use crate::utils::response::{lock_to_dto, not_found_error, storage_error};
use crate::utils::{normalize_optional, normalize_required, parse_vendor};
use api_contract::{ApiResponse, CreateLockRequest, LockDeviceDto, UpdateLockRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::permissions;
use harbor_storage::{
    LockDeviceRecord, LockDeviceUpdate, RemoveOutcome, now_epoch_ms, remove_lock_device,
};
use tracing::info;
use uuid::Uuid;

/// 列出门锁
///
/// # 错误处理
///
/// - `401 UNAUTHORIZED`: 认证失败（token 无效或过期）
/// - `403 FORBIDDEN`: 站点不属于当前租户或缺少权限
/// - `500 INTERNAL SERVER ERROR`: 存储层错误
pub async fn list_locks(
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
    match state
        .lock_store
        .list_lock_devices(&ctx, &path.site_id, false)
        .await
    {
        Ok(items) => {
            let data: Vec<LockDeviceDto> = items.into_iter().map(lock_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 登记门锁
///
/// 新门锁锁状态为 `unknown`，等待第一次状态读取。
///
/// # 流程
///
/// 1. 调用 `require_site_scope` 验证 Bearer token 和站点归属
/// 2. 校验必填字段（name、location、vendor、vendorDeviceId）
/// 3. 生成新的设备 ID（UUID v4）并保存
///
/// # 错误处理
///
/// - `400 BAD REQUEST`: 必填字段缺失或厂商不受支持
/// - `401 UNAUTHORIZED` / `403 FORBIDDEN`
/// - `500 INTERNAL SERVER ERROR`: 存储层错误
pub async fn create_lock(
    State(state): State<AppState>,
    Path(path): Path<SitePath>,
    headers: HeaderMap,
    Json(req): Json<CreateLockRequest>,
) -> Response {
    let ctx = match require_site_scope(&state, &headers, &path.site_id).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&ctx, permissions::LOCK_DEVICE_WRITE) {
        return response;
    }
    let name = match normalize_required(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let location = match normalize_required(req.location, "location") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let vendor = match parse_vendor(&req.vendor) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let vendor_device_id = match normalize_required(req.vendor_device_id, "vendorDeviceId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let category = match normalize_optional(req.category, "category") {
        Ok(value) => value.map(|item| item.to_ascii_lowercase()),
        Err(response) => return response,
    };
    let mut record = LockDeviceRecord::new(
        Uuid::new_v4().to_string(),
        ctx.tenant_id.clone(),
        path.site_id,
        vendor,
        vendor_device_id,
        name,
        location,
        now_epoch_ms(),
    );
    record.manufacturer = req.manufacturer;
    record.model = req.model;
    record.category = category;
    record.requires_key_setup = req.requires_key_setup;
    match state.lock_store.create_lock_device(&ctx, record).await {
        Ok(item) => {
            info!(
                target: "harbor.api",
                tenant_id = %ctx.tenant_id,
                site_id = %item.site_id,
                device_id = %item.device_id,
                vendor = item.vendor.as_str(),
                "lock_device_registered"
            );
            (StatusCode::OK, Json(ApiResponse::success(lock_to_dto(item)))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 获取门锁详情
///
/// 门锁不存在时返回 `404 NOT FOUND`。
pub async fn get_lock(
    State(state): State<AppState>,
    Path(path): Path<LockPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_site_scope(&state, &headers, &path.site_id).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&ctx, permissions::LOCK_DEVICE_READ) {
        return response;
    }
    match state
        .lock_store
        .find_lock_device(&ctx, &path.site_id, &path.device_id)
        .await
    {
        Ok(Some(item)) => {
            (StatusCode::OK, Json(ApiResponse::success(lock_to_dto(item)))).into_response()
        }
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}

/// 更新门锁描述字段
///
/// 只更新提供的字段；字符串字段提供时不能为空。
pub async fn update_lock(
    State(state): State<AppState>,
    Path(path): Path<LockPath>,
    headers: HeaderMap,
    Json(req): Json<UpdateLockRequest>,
) -> Response {
    let ctx = match require_site_scope(&state, &headers, &path.site_id).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&ctx, permissions::LOCK_DEVICE_WRITE) {
        return response;
    }
    let update = match build_update(req) {
        Ok(update) => update,
        Err(response) => return response,
    };
    match state
        .lock_store
        .update_lock_device(&ctx, &path.site_id, &path.device_id, update)
        .await
    {
        Ok(Some(item)) => {
            (StatusCode::OK, Json(ApiResponse::success(lock_to_dto(item)))).into_response()
        }
        Ok(None) => not_found_error(),
        Err(err) => storage_error(err),
    }
}

fn build_update(req: UpdateLockRequest) -> Result<LockDeviceUpdate, Response> {
    Ok(LockDeviceUpdate {
        name: normalize_optional(req.name, "name")?,
        location: normalize_optional(req.location, "location")?,
        manufacturer: normalize_optional(req.manufacturer, "manufacturer")?,
        model: normalize_optional(req.model, "model")?,
        category: normalize_optional(req.category, "category")?
            .map(|item| item.to_ascii_lowercase()),
        vendor_device_id: normalize_optional(req.vendor_device_id, "vendorDeviceId")?,
        is_active: req.is_active,
        requires_key_setup: req.requires_key_setup,
    })
}

/// 删除门锁
///
/// 有门禁日志历史的门锁不会被物理删除，而是停用（`isActive=false`），
/// 响应体中 `deactivated=true`。
pub async fn delete_lock(
    State(state): State<AppState>,
    Path(path): Path<LockPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_site_scope(&state, &headers, &path.site_id).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&ctx, permissions::LOCK_DEVICE_WRITE) {
        return response;
    }
    let outcome = remove_lock_device(
        state.lock_store.as_ref(),
        state.access_log_store.as_ref(),
        &ctx,
        &path.site_id,
        &path.device_id,
    )
    .await;
    match outcome {
        Ok(RemoveOutcome::NotFound) => not_found_error(),
        Ok(outcome) => {
            let deactivated = outcome == RemoveOutcome::Deactivated;
            info!(
                target: "harbor.api",
                tenant_id = %ctx.tenant_id,
                site_id = %path.site_id,
                device_id = %path.device_id,
                deactivated,
                "lock_device_removed"
            );
            (
                StatusCode::OK,
                Json(ApiResponse::success(serde_json::json!({
                    "deleted": !deactivated,
                    "deactivated": deactivated,
                }))),
            )
                .into_response()
        }
        Err(err) => storage_error(err),
    }
}
