//! 站点内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 内置默认站点（site-1，Default Marina）
//! - 租户隔离验证

use crate::error::StorageError;
use crate::models::SiteRecord;
use crate::traits::SiteStore;
use crate::validation::ensure_tenant;
use domain::TenantContext;
use std::collections::HashMap;
use std::sync::RwLock;

/// 站点内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemorySiteStore {
    sites: RwLock<HashMap<String, SiteRecord>>,
}

impl InMemorySiteStore {
    pub fn new() -> Self {
        Self {
            sites: RwLock::new(HashMap::new()),
        }
    }

    /// 内置默认站点
    pub fn with_default_site() -> Self {
        let mut sites = HashMap::new();
        sites.insert(
            "site-1".to_string(),
            SiteRecord {
                site_id: "site-1".to_string(),
                tenant_id: "tenant-1".to_string(),
                name: "Default Marina".to_string(),
                timezone: "UTC".to_string(),
            },
        );
        Self {
            sites: RwLock::new(sites),
        }
    }
}

impl Default for InMemorySiteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SiteStore for InMemorySiteStore {
    async fn list_sites(&self, ctx: &TenantContext) -> Result<Vec<SiteRecord>, StorageError> {
        ensure_tenant(ctx)?;
        let sites = self
            .sites
            .read()
            .map(|map| {
                map.values()
                    .filter(|site| site.tenant_id == ctx.tenant_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(sites)
    }

    async fn find_site(
        &self,
        ctx: &TenantContext,
        site_id: &str,
    ) -> Result<Option<SiteRecord>, StorageError> {
        ensure_tenant(ctx)?;
        let site = self
            .sites
            .read()
            .ok()
            .and_then(|map| map.get(site_id).cloned())
            .filter(|site| site.tenant_id == ctx.tenant_id);
        Ok(site)
    }

    async fn create_site(
        &self,
        ctx: &TenantContext,
        record: SiteRecord,
    ) -> Result<SiteRecord, StorageError> {
        ensure_tenant(ctx)?;
        if record.tenant_id != ctx.tenant_id {
            return Err(StorageError::new("tenant mismatch"));
        }
        let mut map = self
            .sites
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.site_id) {
            return Err(StorageError::new("site exists"));
        }
        map.insert(record.site_id.clone(), record.clone());
        Ok(record)
    }

    async fn site_belongs_to_tenant(
        &self,
        ctx: &TenantContext,
        site_id: &str,
    ) -> Result<bool, StorageError> {
        Ok(self.find_site(ctx, site_id).await?.is_some())
    }
}
