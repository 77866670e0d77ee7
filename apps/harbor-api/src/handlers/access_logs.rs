use super::SitePath;
use crate::AppState;
use crate::middleware::{require_permission, require_site_scope};
use crate::utils::response::{access_log_to_dto, bad_request_error, storage_error};
use crate::utils::clamp_limit;
use api_contract::{AccessLogDto, AccessLogQueryParams, ApiResponse};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::permissions;
use harbor_storage::AccessLogQuery;

/// 查询门禁日志（按时间倒序）
///
/// 查询参数：`deviceId`、`from`/`to`（毫秒时间戳，闭区间）、`limit`。
pub async fn list_access_logs(
    State(state): State<AppState>,
    Path(path): Path<SitePath>,
    Query(params): Query<AccessLogQueryParams>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_site_scope(&state, &headers, &path.site_id).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&ctx, permissions::LOCK_ACCESS_LOG_READ) {
        return response;
    }
    if let (Some(from), Some(to)) = (params.from, params.to) {
        if from > to {
            return bad_request_error("from must not be after to");
        }
    }
    let query = AccessLogQuery {
        device_id: params
            .device_id
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()),
        from_ms: params.from,
        to_ms: params.to,
        limit: clamp_limit(params.limit),
    };
    match state
        .access_log_store
        .list_access_logs(&ctx, &path.site_id, query)
        .await
    {
        Ok(items) => {
            let data: Vec<AccessLogDto> = items.into_iter().map(access_log_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}
