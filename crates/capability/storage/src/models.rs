//! 数据模型
//!
//! 定义所有存储相关的数据模型和更新结构：
//! - 站点模型：SiteRecord（码头/游艇所在站点，用于租户归属校验）
//! - 门锁模型：LockDeviceRecord, LockDeviceUpdate, LockTelemetryUpdate
//! - 凭证模型：CredentialSetRecord（每站点每厂商至多一套生效凭证）
//! - 门禁日志：AccessLogRecord, AccessLogQuery（只追加）

use domain::{AccessAction, CommandErrorKind, LockState, VendorKind};

/// 站点记录（用于租户归属校验）。
#[derive(Debug, Clone)]
pub struct SiteRecord {
    pub site_id: String,
    pub tenant_id: String,
    pub name: String,
    pub timezone: String,
}

// ============================================================================
// 门锁设备
// ============================================================================

/// 门锁设备记录。
///
/// 遥测字段（锁状态、在线、电量）只由编排层在设备租约内写入；
/// 描述字段由管理员维护。
#[derive(Debug, Clone)]
pub struct LockDeviceRecord {
    pub device_id: String,
    pub tenant_id: String,
    pub site_id: String,
    pub vendor: VendorKind,
    /// 厂商侧设备 ID
    pub vendor_device_id: String,
    /// 厂商侧本地密钥（密钥配置成功后写入）
    pub local_key: Option<String>,
    pub name: String,
    /// 安装位置标签，如 "front door"
    pub location: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    /// 设备品类（决定是否必须先完成密钥配置）
    pub category: Option<String>,
    pub lock_state: LockState,
    /// 最近一次锁状态变化时间（任何来源）
    pub lock_state_updated_at_ms: Option<i64>,
    /// 最近一次由状态读取或人工纠正确认锁状态的时间
    pub lock_state_confirmed_at_ms: Option<i64>,
    pub online: bool,
    pub battery_level: Option<u8>,
    pub last_status_check_ms: Option<i64>,
    pub is_active: bool,
    pub requires_key_setup: bool,
    pub key_set_at_ms: Option<i64>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl LockDeviceRecord {
    /// 新设备：锁状态未知、离线、未检查。
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device_id: impl Into<String>,
        tenant_id: impl Into<String>,
        site_id: impl Into<String>,
        vendor: VendorKind,
        vendor_device_id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        now_ms: i64,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            tenant_id: tenant_id.into(),
            site_id: site_id.into(),
            vendor,
            vendor_device_id: vendor_device_id.into(),
            local_key: None,
            name: name.into(),
            location: location.into(),
            manufacturer: None,
            model: None,
            category: None,
            lock_state: LockState::Unknown,
            lock_state_updated_at_ms: None,
            lock_state_confirmed_at_ms: None,
            online: false,
            battery_level: None,
            last_status_check_ms: None,
            is_active: true,
            requires_key_setup: false,
            key_set_at_ms: None,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    /// 当前缓存状态是否已被读取/人工确认（否则为乐观推断）。
    pub fn is_state_confirmed(&self) -> bool {
        match (self.lock_state_updated_at_ms, self.lock_state_confirmed_at_ms) {
            (Some(updated), Some(confirmed)) => confirmed >= updated,
            (None, _) => false,
            (Some(_), None) => false,
        }
    }

    /// 是否仍在等待密钥配置。
    pub fn key_setup_pending(&self) -> bool {
        self.requires_key_setup || self.local_key.is_none()
    }
}

/// 门锁描述字段更新输入（管理员编辑）。
#[derive(Debug, Clone, Default)]
pub struct LockDeviceUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub category: Option<String>,
    pub vendor_device_id: Option<String>,
    pub is_active: Option<bool>,
    pub requires_key_setup: Option<bool>,
}

/// 门锁遥测写入（编排层使用）。
///
/// `None` 字段保持原值。
#[derive(Debug, Clone, Default)]
pub struct LockTelemetryUpdate {
    pub lock_state: Option<LockState>,
    pub lock_state_confirmed: bool,
    pub online: Option<bool>,
    pub battery_level: Option<u8>,
    pub last_status_check_ms: Option<i64>,
    pub ts_ms: i64,
}

/// 密钥配置结果写入。
#[derive(Debug, Clone)]
pub struct KeyProvisioned {
    pub local_key: String,
    pub key_set_at_ms: i64,
}

// ============================================================================
// 厂商凭证
// ============================================================================

/// 厂商 API 凭证（每站点每厂商至多一套生效）。
#[derive(Debug, Clone)]
pub struct CredentialSetRecord {
    pub credential_id: String,
    pub tenant_id: String,
    pub site_id: String,
    pub vendor: VendorKind,
    pub client_id: String,
    pub client_secret: String,
    pub region: String,
    /// 自定义网关地址（可选，覆盖按区域推导的地址）
    pub base_url: Option<String>,
    pub is_active: bool,
    pub updated_at_ms: i64,
}

// ============================================================================
// 门禁日志
// ============================================================================

/// 门禁日志记录（写入后不可修改）。
#[derive(Debug, Clone)]
pub struct AccessLogRecord {
    pub log_id: String,
    pub tenant_id: String,
    pub site_id: String,
    pub device_id: String,
    /// 操作人显示名
    pub actor: String,
    pub action: AccessAction,
    /// 位置标签（冗余存储，便于展示）
    pub location: String,
    pub success: bool,
    pub error_kind: Option<CommandErrorKind>,
    pub error_message: Option<String>,
    pub ts_ms: i64,
}

/// 门禁日志查询条件。
#[derive(Debug, Clone, Default)]
pub struct AccessLogQuery {
    pub device_id: Option<String>,
    pub from_ms: Option<i64>,
    pub to_ms: Option<i64>,
    pub limit: i64,
}
