//! 设备租约：同一设备的命令、刷新与延迟复查串行执行。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

#[derive(Default)]
pub struct DeviceLeases {
    leases: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl DeviceLeases {
    pub fn new() -> Self {
        Self::default()
    }

    /// 等待并持有设备租约，guard 释放即归还。
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lease = {
            let mut leases = self
                .leases
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            // 只剩表内引用的租约无人持有也无人等待，可以回收
            leases.retain(|_, lease| Arc::strong_count(lease) > 1);
            leases
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        lease.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.leases
            .lock()
            .map(|leases| leases.len())
            .unwrap_or_default()
    }
}

pub fn lease_key(tenant_id: &str, site_id: &str, device_id: &str) -> String {
    format!("{}:{}:{}", tenant_id, site_id, device_id)
}
