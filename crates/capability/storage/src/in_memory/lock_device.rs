//! 门锁设备内存存储实现
//!
//! 仅用于本地演示和测试。

use crate::error::StorageError;
use crate::models::{KeyProvisioned, LockDeviceRecord, LockDeviceUpdate, LockTelemetryUpdate};
use crate::traits::LockDeviceStore;
use crate::validation::ensure_site_scope;
use domain::TenantContext;
use std::collections::HashMap;
use std::sync::RwLock;

/// 门锁设备内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemoryLockDeviceStore {
    devices: RwLock<HashMap<String, LockDeviceRecord>>,
}

impl InMemoryLockDeviceStore {
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
        }
    }

    /// 在写锁内修改作用域内的设备，返回修改后的副本。
    fn modify<F>(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
        apply: F,
    ) -> Result<Option<LockDeviceRecord>, StorageError>
    where
        F: FnOnce(&mut LockDeviceRecord),
    {
        ensure_site_scope(ctx, site_id)?;
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let device = match map.get_mut(device_id) {
            Some(device) => device,
            None => return Ok(None),
        };
        if device.tenant_id != ctx.tenant_id || device.site_id != site_id {
            return Ok(None);
        }
        apply(device);
        Ok(Some(device.clone()))
    }
}

impl Default for InMemoryLockDeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LockDeviceStore for InMemoryLockDeviceStore {
    async fn list_lock_devices(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        active_only: bool,
    ) -> Result<Vec<LockDeviceRecord>, StorageError> {
        ensure_site_scope(ctx, site_id)?;
        let mut items: Vec<LockDeviceRecord> = self
            .devices
            .read()
            .map(|map| {
                map.values()
                    .filter(|item| item.tenant_id == ctx.tenant_id && item.site_id == site_id)
                    .filter(|item| !active_only || item.is_active)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        items.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        Ok(items)
    }

    async fn find_lock_device(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<Option<LockDeviceRecord>, StorageError> {
        ensure_site_scope(ctx, site_id)?;
        let item = self
            .devices
            .read()
            .ok()
            .and_then(|map| map.get(device_id).cloned())
            .filter(|item| item.tenant_id == ctx.tenant_id && item.site_id == site_id);
        Ok(item)
    }

    async fn create_lock_device(
        &self,
        ctx: &TenantContext,
        record: LockDeviceRecord,
    ) -> Result<LockDeviceRecord, StorageError> {
        ensure_site_scope(ctx, &record.site_id)?;
        if record.tenant_id != ctx.tenant_id {
            return Err(StorageError::new("tenant mismatch"));
        }
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.device_id) {
            return Err(StorageError::new("device exists"));
        }
        map.insert(record.device_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_lock_device(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
        update: LockDeviceUpdate,
    ) -> Result<Option<LockDeviceRecord>, StorageError> {
        let now_ms = crate::now_epoch_ms();
        self.modify(ctx, site_id, device_id, |device| {
            if let Some(name) = update.name {
                device.name = name;
            }
            if let Some(location) = update.location {
                device.location = location;
            }
            if let Some(manufacturer) = update.manufacturer {
                device.manufacturer = Some(manufacturer);
            }
            if let Some(model) = update.model {
                device.model = Some(model);
            }
            if let Some(category) = update.category {
                device.category = Some(category);
            }
            if let Some(vendor_device_id) = update.vendor_device_id {
                device.vendor_device_id = vendor_device_id;
            }
            if let Some(is_active) = update.is_active {
                device.is_active = is_active;
            }
            if let Some(requires_key_setup) = update.requires_key_setup {
                device.requires_key_setup = requires_key_setup;
            }
            device.updated_at_ms = now_ms;
        })
    }

    async fn apply_telemetry(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
        update: LockTelemetryUpdate,
    ) -> Result<Option<LockDeviceRecord>, StorageError> {
        self.modify(ctx, site_id, device_id, |device| {
            if let Some(state) = update.lock_state {
                if device.lock_state != state || device.lock_state_updated_at_ms.is_none() {
                    device.lock_state_updated_at_ms = Some(update.ts_ms);
                }
                device.lock_state = state;
                if update.lock_state_confirmed {
                    device.lock_state_confirmed_at_ms = Some(update.ts_ms);
                    device.lock_state_updated_at_ms = Some(update.ts_ms);
                }
            }
            if let Some(online) = update.online {
                device.online = online;
            }
            if let Some(battery_level) = update.battery_level {
                device.battery_level = Some(battery_level.min(100));
            }
            if let Some(checked) = update.last_status_check_ms {
                device.last_status_check_ms = Some(checked);
            }
            device.updated_at_ms = update.ts_ms;
        })
    }

    async fn record_key_provisioned(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
        key: KeyProvisioned,
    ) -> Result<Option<LockDeviceRecord>, StorageError> {
        self.modify(ctx, site_id, device_id, |device| {
            device.local_key = Some(key.local_key);
            device.key_set_at_ms = Some(key.key_set_at_ms);
            device.requires_key_setup = false;
            device.updated_at_ms = key.key_set_at_ms;
        })
    }

    async fn purge_lock_device(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<bool, StorageError> {
        ensure_site_scope(ctx, site_id)?;
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        match map.get(device_id) {
            Some(item) if item.tenant_id == ctx.tenant_id && item.site_id == site_id => {
                map.remove(device_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
