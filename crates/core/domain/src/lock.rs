//! 门锁领域枚举：锁状态、命令、日志动作、厂商与错误分类。
//!
//! 所有枚举都提供稳定的字符串编码（`as_str` / `parse`），
//! 存储层与 API 层只通过这些编码落库和序列化。

/// 本地缓存的门锁状态（三态）。
///
/// 首次成功读取状态之前为 `Unknown`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LockState {
    Locked,
    Unlocked,
    #[default]
    Unknown,
}

impl LockState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockState::Locked => "locked",
            LockState::Unlocked => "unlocked",
            LockState::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "locked" => Some(LockState::Locked),
            "unlocked" => Some(LockState::Unlocked),
            "unknown" => Some(LockState::Unknown),
            _ => None,
        }
    }

    /// 由厂商返回的可选布尔值映射；缺失即 `Unknown`，不做猜测。
    pub fn from_is_locked(is_locked: Option<bool>) -> Self {
        match is_locked {
            Some(true) => LockState::Locked,
            Some(false) => LockState::Unlocked,
            None => LockState::Unknown,
        }
    }

    pub fn is_locked(&self) -> Option<bool> {
        match self {
            LockState::Locked => Some(true),
            LockState::Unlocked => Some(false),
            LockState::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, LockState::Unknown)
    }
}

/// 调用方可下发的命令。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockAction {
    Lock,
    Unlock,
    Status,
    Diagnostics,
    ProvisionKey,
}

impl LockAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockAction::Lock => "lock",
            LockAction::Unlock => "unlock",
            LockAction::Status => "status",
            LockAction::Diagnostics => "diagnostics",
            LockAction::ProvisionKey => "provision_key",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lock" => Some(LockAction::Lock),
            "unlock" => Some(LockAction::Unlock),
            "status" => Some(LockAction::Status),
            "diagnostics" => Some(LockAction::Diagnostics),
            "provision_key" | "provision-key" => Some(LockAction::ProvisionKey),
            _ => None,
        }
    }

    /// 会改变物理状态的命令（受密钥配置前置条件约束）。
    pub fn is_actuation(&self) -> bool {
        matches!(self, LockAction::Lock | LockAction::Unlock)
    }

    /// 命令成功后的预期状态（仅 lock/unlock 有意义）。
    pub fn target_state(&self) -> Option<LockState> {
        match self {
            LockAction::Lock => Some(LockState::Locked),
            LockAction::Unlock => Some(LockState::Unlocked),
            _ => None,
        }
    }

    pub fn access_action(&self) -> AccessAction {
        match self {
            LockAction::Lock => AccessAction::Lock,
            LockAction::Unlock => AccessAction::Unlock,
            LockAction::Status => AccessAction::Status,
            LockAction::Diagnostics => AccessAction::Diagnostics,
            LockAction::ProvisionKey => AccessAction::ProvisionKey,
        }
    }
}

/// 门禁日志动作类型（日志字段值对报表端是契约）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessAction {
    Lock,
    Unlock,
    Status,
    Diagnostics,
    ManualCorrection,
    ProvisionKey,
}

impl AccessAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessAction::Lock => "lock",
            AccessAction::Unlock => "unlock",
            AccessAction::Status => "status",
            AccessAction::Diagnostics => "diagnostics",
            AccessAction::ManualCorrection => "manual_correction",
            AccessAction::ProvisionKey => "provision_key",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lock" => Some(AccessAction::Lock),
            "unlock" => Some(AccessAction::Unlock),
            "status" => Some(AccessAction::Status),
            "diagnostics" => Some(AccessAction::Diagnostics),
            "manual_correction" => Some(AccessAction::ManualCorrection),
            "provision_key" => Some(AccessAction::ProvisionKey),
            _ => None,
        }
    }
}

/// 门锁厂商。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorKind {
    Tuya,
    Ttlock,
}

impl VendorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorKind::Tuya => "tuya",
            VendorKind::Ttlock => "ttlock",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tuya" => Some(VendorKind::Tuya),
            "ttlock" | "tt_lock" => Some(VendorKind::Ttlock),
            _ => None,
        }
    }
}

/// 命令失败分类。
///
/// 由厂商适配层产生，编排层原样透传；`KeySetupRequired` 是唯一的本地前置条件错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandErrorKind {
    AuthFailed,
    SubscriptionExpired,
    DeviceOffline,
    DeviceNotFound,
    VendorUnavailable,
    KeySetupRequired,
    Unknown,
}

impl CommandErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            CommandErrorKind::AuthFailed => "AUTH_FAILED",
            CommandErrorKind::SubscriptionExpired => "SUBSCRIPTION_EXPIRED",
            CommandErrorKind::DeviceOffline => "DEVICE_OFFLINE",
            CommandErrorKind::DeviceNotFound => "DEVICE_NOT_FOUND",
            CommandErrorKind::VendorUnavailable => "VENDOR_UNAVAILABLE",
            CommandErrorKind::KeySetupRequired => "KEY_SETUP_REQUIRED",
            CommandErrorKind::Unknown => "UNKNOWN",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "AUTH_FAILED" => Some(CommandErrorKind::AuthFailed),
            "SUBSCRIPTION_EXPIRED" => Some(CommandErrorKind::SubscriptionExpired),
            "DEVICE_OFFLINE" => Some(CommandErrorKind::DeviceOffline),
            "DEVICE_NOT_FOUND" => Some(CommandErrorKind::DeviceNotFound),
            "VENDOR_UNAVAILABLE" => Some(CommandErrorKind::VendorUnavailable),
            "KEY_SETUP_REQUIRED" => Some(CommandErrorKind::KeySetupRequired),
            "UNKNOWN" => Some(CommandErrorKind::Unknown),
            _ => None,
        }
    }

    /// 稍后重试可能成功（网络/服务端瞬时错误）。
    pub fn is_transient(&self) -> bool {
        matches!(self, CommandErrorKind::VendorUnavailable | CommandErrorKind::DeviceOffline)
    }

    /// 影响整个厂商账号而非单台设备。
    pub fn is_account_level(&self) -> bool {
        matches!(self, CommandErrorKind::AuthFailed | CommandErrorKind::SubscriptionExpired)
    }
}

impl std::fmt::Display for CommandErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
