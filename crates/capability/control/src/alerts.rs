//! 厂商订阅过期告警
//!
//! 按 (租户, 站点, 厂商) 记一个标志，界面据此显示全局横幅而不是逐台设备报错；
//! 同一凭证下任意一次成功调用即清除。

use domain::VendorKind;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionAlert {
    pub site_id: String,
    pub vendor: VendorKind,
    pub credential_id: String,
    pub detail: String,
    pub raised_at_ms: i64,
}

type AlertKey = (String, String, VendorKind);

#[derive(Default)]
pub struct SubscriptionAlerts {
    flags: RwLock<HashMap<AlertKey, SubscriptionAlert>>,
}

impl SubscriptionAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    /// 首次置位时保留最早的时间，重复命中只刷新 detail。
    pub fn raise(&self, tenant_id: &str, alert: SubscriptionAlert) {
        if let Ok(mut flags) = self.flags.write() {
            let key = (tenant_id.to_string(), alert.site_id.clone(), alert.vendor);
            flags
                .entry(key)
                .and_modify(|existing| {
                    existing.detail = alert.detail.clone();
                    existing.credential_id = alert.credential_id.clone();
                })
                .or_insert(alert);
        }
    }

    pub fn clear(&self, tenant_id: &str, site_id: &str, vendor: VendorKind) -> bool {
        match self.flags.write() {
            Ok(mut flags) => flags
                .remove(&(tenant_id.to_string(), site_id.to_string(), vendor))
                .is_some(),
            Err(_) => false,
        }
    }

    pub fn list(&self, tenant_id: &str, site_id: &str) -> Vec<SubscriptionAlert> {
        let mut items: Vec<SubscriptionAlert> = self
            .flags
            .read()
            .map(|flags| {
                flags
                    .iter()
                    .filter(|((tenant, site, _), _)| tenant == tenant_id && site == site_id)
                    .map(|(_, alert)| alert.clone())
                    .collect()
            })
            .unwrap_or_default();
        items.sort_by(|a, b| a.vendor.as_str().cmp(b.vendor.as_str()));
        items
    }
}
