//! 厂商凭证 handlers
//!
//! - GET /sites/{id}/lock-credentials - 列出凭证（不回显 secret）
//! - PUT /sites/{id}/lock-credentials - 写入凭证；生效凭证每站点每厂商唯一
//!
//! 写入后作废适配器中该凭证的缓存令牌。

use super::SitePath;
use crate::AppState;
use crate::middleware::{require_permission, require_site_scope};
use crate::utils::response::{credential_to_dto, storage_error};
use crate::utils::{normalize_optional, normalize_required, parse_vendor};
use api_contract::{ApiResponse, CredentialDto, UpsertCredentialRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::permissions;
use harbor_storage::{CredentialSetRecord, now_epoch_ms};
use tracing::info;
use uuid::Uuid;

const DEFAULT_REGION: &str = "us";

pub async fn list_credentials(
    State(state): State<AppState>,
    Path(path): Path<SitePath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_site_scope(&state, &headers, &path.site_id).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&ctx, permissions::LOCK_CREDENTIAL_READ) {
        return response;
    }
    match state
        .credential_store
        .list_credentials(&ctx, &path.site_id, None)
        .await
    {
        Ok(items) => {
            let data: Vec<CredentialDto> = items.into_iter().map(credential_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 写入凭证
///
/// 同站点同厂商已有生效凭证时原地更新（保留 credential_id），否则新建。
pub async fn upsert_credentials(
    State(state): State<AppState>,
    Path(path): Path<SitePath>,
    headers: HeaderMap,
    Json(req): Json<UpsertCredentialRequest>,
) -> Response {
    let ctx = match require_site_scope(&state, &headers, &path.site_id).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&ctx, permissions::LOCK_CREDENTIAL_WRITE) {
        return response;
    }
    let vendor = match parse_vendor(&req.vendor) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let client_id = match normalize_required(req.client_id, "clientId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let client_secret = match normalize_required(req.client_secret, "clientSecret") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let region = match normalize_optional(req.region, "region") {
        Ok(value) => value
            .map(|item| item.to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        Err(response) => return response,
    };
    let base_url = match normalize_optional(req.base_url, "baseUrl") {
        Ok(value) => value,
        Err(response) => return response,
    };

    let existing = match state
        .credential_store
        .list_credentials(&ctx, &path.site_id, Some(vendor))
        .await
    {
        Ok(items) => items.into_iter().find(|item| item.is_active),
        Err(err) => return storage_error(err),
    };
    let credential_id = existing
        .map(|item| item.credential_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let record = CredentialSetRecord {
        credential_id,
        tenant_id: ctx.tenant_id.clone(),
        site_id: path.site_id.clone(),
        vendor,
        client_id,
        client_secret,
        region,
        base_url,
        is_active: req.is_active,
        updated_at_ms: now_epoch_ms(),
    };
    match state.credential_store.upsert_credentials(&ctx, record).await {
        Ok(item) => {
            state
                .orchestrator
                .invalidate_credentials(item.vendor, &item.credential_id);
            info!(
                target: "harbor.api",
                tenant_id = %ctx.tenant_id,
                site_id = %path.site_id,
                vendor = item.vendor.as_str(),
                credential_id = %item.credential_id,
                is_active = item.is_active,
                "lock_credentials_updated"
            );
            (
                StatusCode::OK,
                Json(ApiResponse::success(credential_to_dto(item))),
            )
                .into_response()
        }
        Err(err) => storage_error(err),
    }
}
