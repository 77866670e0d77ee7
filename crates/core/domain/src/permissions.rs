//! 权限码常量。
//!
//! 上游认证层把权限码写入 access token，API 层按下列常量校验。

pub const LOCK_DEVICE_READ: &str = "LOCK.DEVICE.READ";
pub const LOCK_DEVICE_WRITE: &str = "LOCK.DEVICE.WRITE";
pub const LOCK_COMMAND_ISSUE: &str = "LOCK.COMMAND.ISSUE";
pub const LOCK_STATUS_REFRESH: &str = "LOCK.STATUS.REFRESH";
/// 人工纠正门锁状态（特权操作）。
pub const LOCK_MANUAL_CORRECTION: &str = "LOCK.MANUAL_CORRECTION";
pub const LOCK_KEY_PROVISION: &str = "LOCK.KEY.PROVISION";
pub const LOCK_ACCESS_LOG_READ: &str = "LOCK.ACCESS_LOG.READ";
pub const LOCK_CREDENTIAL_READ: &str = "LOCK.CREDENTIAL.READ";
pub const LOCK_CREDENTIAL_WRITE: &str = "LOCK.CREDENTIAL.WRITE";

/// 全部权限码（管理面展示用）。
pub const ALL: &[&str] = &[
    LOCK_DEVICE_READ,
    LOCK_DEVICE_WRITE,
    LOCK_COMMAND_ISSUE,
    LOCK_STATUS_REFRESH,
    LOCK_MANUAL_CORRECTION,
    LOCK_KEY_PROVISION,
    LOCK_ACCESS_LOG_READ,
    LOCK_CREDENTIAL_READ,
    LOCK_CREDENTIAL_WRITE,
];
