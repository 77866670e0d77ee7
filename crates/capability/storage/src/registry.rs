//! 门锁登记的跨存储规则
//!
//! - 有门禁日志历史的设备永不物理删除，删除请求降级为停用
//! - 站点下"所有生效设备"的读取入口

use crate::error::StorageError;
use crate::models::{LockDeviceRecord, LockDeviceUpdate};
use crate::traits::{AccessLogStore, LockDeviceStore};
use domain::TenantContext;

/// 删除请求的处理结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// 无日志历史，已物理删除
    Deleted,
    /// 存在日志历史，已停用
    Deactivated,
    NotFound,
}

/// 删除门锁：有日志历史时改为停用（`is_active = false`）。
pub async fn remove_lock_device(
    devices: &dyn LockDeviceStore,
    logs: &dyn AccessLogStore,
    ctx: &TenantContext,
    site_id: &str,
    device_id: &str,
) -> Result<RemoveOutcome, StorageError> {
    if devices
        .find_lock_device(ctx, site_id, device_id)
        .await?
        .is_none()
    {
        return Ok(RemoveOutcome::NotFound);
    }
    let history = logs.count_access_logs(ctx, site_id, device_id).await?;
    if history == 0 && devices.purge_lock_device(ctx, site_id, device_id).await? {
        return Ok(RemoveOutcome::Deleted);
    }
    let update = LockDeviceUpdate {
        is_active: Some(false),
        ..LockDeviceUpdate::default()
    };
    match devices
        .update_lock_device(ctx, site_id, device_id, update)
        .await?
    {
        Some(_) => Ok(RemoveOutcome::Deactivated),
        None => Ok(RemoveOutcome::NotFound),
    }
}

/// 站点下所有生效门锁。
pub async fn active_lock_devices(
    devices: &dyn LockDeviceStore,
    ctx: &TenantContext,
    site_id: &str,
) -> Result<Vec<LockDeviceRecord>, StorageError> {
    devices.list_lock_devices(ctx, site_id, true).await
}
