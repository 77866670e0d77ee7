//! HTTP 响应辅助函数和 DTO 转换
//!
//! 提供统一的错误响应构造函数和 DTO 转换函数：
//! - 错误响应：auth_error, forbidden_error, bad_request_error, not_found_error, internal_auth_error, storage_error, control_error
//! - 命令结果：command_response（失败时 `success=false` 仍携带结果体）
//! - DTO 转换：lock_to_dto, command_to_dto, sweep_to_dto, access_log_to_dto, credential_to_dto, alert_to_dto

use api_contract::{
    AccessLogDto, ApiResponse, CommandResultDto, CredentialDto, LockAlertDto, LockDeviceDto,
    SweepFailureDto, SweepReportDto, remediation_hint,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::CommandErrorKind;
use harbor_auth::AuthError;
use harbor_control::{CommandResult, ControlError, SubscriptionAlert, SweepReport};
use harbor_storage::{AccessLogRecord, CredentialSetRecord, LockDeviceRecord, StorageError};

/// 认证错误响应
pub fn auth_error(status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse::<()>::error(
            "AUTH.UNAUTHORIZED",
            "unauthorized",
        )),
    )
        .into_response()
}

/// 禁止访问错误响应
pub fn forbidden_error() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::<()>::error("AUTH.FORBIDDEN", "forbidden")),
    )
        .into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", "not found")),
    )
        .into_response()
}

/// 认证内部错误响应
pub fn internal_auth_error(err: AuthError) -> Response {
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
    )
        .into_response()
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
    )
        .into_response()
}

/// 编排层错误响应
pub fn control_error(err: ControlError) -> Response {
    match err {
        ControlError::InvalidRequest(message) => bad_request_error(message),
        ControlError::Storage(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
        )
            .into_response(),
    }
}

/// 命令结果响应
///
/// 厂商失败不是 HTTP 层错误：返回结果体 + 错误分类码 + 处理建议。
pub fn command_response(result: CommandResult) -> Response {
    match result.error_kind {
        None => (
            StatusCode::OK,
            Json(ApiResponse::success(command_to_dto(result))),
        )
            .into_response(),
        Some(kind) => {
            let status = command_failure_status(kind);
            let code = format!("LOCK.{}", kind.code());
            (
                status,
                Json(ApiResponse::failed(
                    command_to_dto(result),
                    code,
                    remediation_hint(kind),
                )),
            )
                .into_response()
        }
    }
}

/// 错误分类对应的 HTTP 状态码
pub fn command_failure_status(kind: CommandErrorKind) -> StatusCode {
    match kind {
        CommandErrorKind::DeviceNotFound => StatusCode::NOT_FOUND,
        CommandErrorKind::KeySetupRequired => StatusCode::CONFLICT,
        CommandErrorKind::VendorUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        CommandErrorKind::AuthFailed
        | CommandErrorKind::SubscriptionExpired
        | CommandErrorKind::DeviceOffline
        | CommandErrorKind::Unknown => StatusCode::BAD_GATEWAY,
    }
}

/// LockDeviceRecord 转 LockDeviceDto
pub fn lock_to_dto(record: LockDeviceRecord) -> LockDeviceDto {
    let state_confirmed = record.is_state_confirmed();
    LockDeviceDto {
        device_id: record.device_id,
        site_id: record.site_id,
        name: record.name,
        location: record.location,
        vendor: record.vendor.as_str().to_string(),
        vendor_device_id: record.vendor_device_id,
        manufacturer: record.manufacturer,
        model: record.model,
        category: record.category,
        lock_state: record.lock_state.as_str().to_string(),
        state_confirmed,
        lock_state_updated_at_ms: record.lock_state_updated_at_ms,
        online: record.online,
        battery_level: record.battery_level,
        last_status_check_ms: record.last_status_check_ms,
        is_active: record.is_active,
        requires_key_setup: record.requires_key_setup,
        key_configured: record.local_key.is_some(),
    }
}

/// CommandResult 转 CommandResultDto（不透出厂商原始报文）
pub fn command_to_dto(result: CommandResult) -> CommandResultDto {
    CommandResultDto {
        device_id: result.device_id,
        action: result.action.as_str().to_string(),
        success: result.success,
        is_locked: result.is_locked,
        confirmed: result.confirmed,
        online: result.online,
        battery_level: result.battery_level,
        diagnostics: result.diagnostics,
        error_kind: result.error_kind.map(|kind| kind.code().to_string()),
        remediation: result
            .error_kind
            .map(|kind| remediation_hint(kind).to_string()),
    }
}

/// SweepReport 转 SweepReportDto
pub fn sweep_to_dto(report: SweepReport) -> SweepReportDto {
    SweepReportDto {
        site_id: report.site_id,
        total: report.total,
        refreshed: report.refreshed,
        failed: report
            .failed
            .into_iter()
            .map(|item| SweepFailureDto {
                device_id: item.device_id,
                error_kind: item.error_kind.map(|kind| kind.code().to_string()),
            })
            .collect(),
    }
}

/// AccessLogRecord 转 AccessLogDto
pub fn access_log_to_dto(record: AccessLogRecord) -> AccessLogDto {
    AccessLogDto {
        log_id: record.log_id,
        device_id: record.device_id,
        actor: record.actor,
        action: record.action.as_str().to_string(),
        location: record.location,
        success: record.success,
        error_kind: record.error_kind.map(|kind| kind.code().to_string()),
        error_message: record.error_message,
        ts_ms: record.ts_ms,
    }
}

/// CredentialSetRecord 转 CredentialDto（secret 只标记是否已配置）
pub fn credential_to_dto(record: CredentialSetRecord) -> CredentialDto {
    CredentialDto {
        credential_id: record.credential_id,
        vendor: record.vendor.as_str().to_string(),
        client_id: record.client_id,
        secret_configured: !record.client_secret.is_empty(),
        region: record.region,
        base_url: record.base_url,
        is_active: record.is_active,
        updated_at_ms: record.updated_at_ms,
    }
}

/// SubscriptionAlert 转 LockAlertDto
pub fn alert_to_dto(alert: SubscriptionAlert) -> LockAlertDto {
    LockAlertDto {
        site_id: alert.site_id,
        vendor: alert.vendor.as_str().to_string(),
        credential_id: alert.credential_id,
        kind: CommandErrorKind::SubscriptionExpired.code().to_string(),
        message: remediation_hint(CommandErrorKind::SubscriptionExpired).to_string(),
        raised_at_ms: alert.raised_at_ms,
    }
}
