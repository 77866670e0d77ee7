//! 稳定的 DTO 与 API 响应契约。

use domain::CommandErrorKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }

    /// 命令失败：`success=false` 但仍携带结果体（含错误分类与处理建议）。
    pub fn failed(data: T, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Some(data),
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 面向船员的处理建议（只由错误分类推导，不透出厂商原始报文）。
pub fn remediation_hint(kind: CommandErrorKind) -> &'static str {
    match kind {
        CommandErrorKind::AuthFailed => {
            "Vendor credentials were rejected. Ask an administrator to update the lock credentials."
        }
        CommandErrorKind::SubscriptionExpired => {
            "The vendor cloud subscription has expired. Renew it before issuing lock commands."
        }
        CommandErrorKind::DeviceOffline => {
            "The lock is offline. Check its gateway and batteries, then retry."
        }
        CommandErrorKind::DeviceNotFound => {
            "The lock is not registered with the vendor. Verify the vendor device ID."
        }
        CommandErrorKind::VendorUnavailable => {
            "The vendor cloud did not respond. Retry in a moment."
        }
        CommandErrorKind::KeySetupRequired => {
            "Key setup is required before this lock can be operated remotely."
        }
        CommandErrorKind::Unknown => "The command failed. Check the lock state on board.",
    }
}

// ============================================================================
// 门锁设备
// ============================================================================

/// 门锁登记请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLockRequest {
    pub name: String,
    pub location: String,
    pub vendor: String,
    pub vendor_device_id: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub requires_key_setup: bool,
}

/// 门锁描述字段更新请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLockRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub category: Option<String>,
    pub vendor_device_id: Option<String>,
    pub is_active: Option<bool>,
    pub requires_key_setup: Option<bool>,
}

/// 门锁返回结构。本地密钥只暴露是否已配置。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockDeviceDto {
    pub device_id: String,
    pub site_id: String,
    pub name: String,
    pub location: String,
    pub vendor: String,
    pub vendor_device_id: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub category: Option<String>,
    pub lock_state: String,
    /// 缓存状态已被状态读取/人工纠正确认
    pub state_confirmed: bool,
    pub lock_state_updated_at_ms: Option<i64>,
    pub online: bool,
    pub battery_level: Option<u8>,
    pub last_status_check_ms: Option<i64>,
    pub is_active: bool,
    pub requires_key_setup: bool,
    pub key_configured: bool,
}

// ============================================================================
// 命令
// ============================================================================

/// 命令请求体：`lock | unlock | status | diagnostics | provision_key`。
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub action: String,
}

/// 人工纠正请求体：`locked | unlocked`。
#[derive(Debug, Deserialize)]
pub struct ManualCorrectionRequest {
    pub state: String,
}

/// 命令结果。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResultDto {
    pub device_id: String,
    pub action: String,
    pub success: bool,
    pub is_locked: Option<bool>,
    /// false 表示乐观推断，尚待状态读取确认
    pub confirmed: bool,
    pub online: Option<bool>,
    pub battery_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Value>,
    pub error_kind: Option<String>,
    pub remediation: Option<String>,
}

/// 批量刷新中单台设备的失败项。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepFailureDto {
    pub device_id: String,
    pub error_kind: Option<String>,
}

/// 批量刷新汇总。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReportDto {
    pub site_id: String,
    pub total: usize,
    pub refreshed: usize,
    pub failed: Vec<SweepFailureDto>,
}

// ============================================================================
// 门禁日志
// ============================================================================

/// 门禁日志查询参数。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogQueryParams {
    pub device_id: Option<String>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub limit: Option<i64>,
}

/// 门禁日志返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogDto {
    pub log_id: String,
    pub device_id: String,
    pub actor: String,
    pub action: String,
    pub location: String,
    pub success: bool,
    pub error_kind: Option<String>,
    pub error_message: Option<String>,
    pub ts_ms: i64,
}

// ============================================================================
// 厂商凭证
// ============================================================================

/// 凭证写入请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertCredentialRequest {
    pub vendor: String,
    pub client_id: String,
    pub client_secret: String,
    pub region: Option<String>,
    pub base_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// 凭证返回结构（不回显 secret）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDto {
    pub credential_id: String,
    pub vendor: String,
    pub client_id: String,
    pub secret_configured: bool,
    pub region: String,
    pub base_url: Option<String>,
    pub is_active: bool,
    pub updated_at_ms: i64,
}

/// 厂商订阅过期提示。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockAlertDto {
    pub site_id: String,
    pub vendor: String,
    pub credential_id: String,
    pub kind: String,
    pub message: String,
    pub raised_at_ms: i64,
}
