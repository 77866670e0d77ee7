//! 厂商凭证内存存储实现
//!
//! 仅用于本地演示和测试。

use crate::error::StorageError;
use crate::models::CredentialSetRecord;
use crate::traits::CredentialStore;
use crate::validation::ensure_site_scope;
use domain::{TenantContext, VendorKind};
use std::sync::RwLock;

/// 厂商凭证内存存储
pub struct InMemoryCredentialStore {
    credentials: RwLock<Vec<CredentialSetRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            credentials: RwLock::new(Vec::new()),
        }
    }

    /// 直接写入凭证，不做生效唯一性处理（测试构造冲突数据用）。
    pub fn insert_raw(&self, record: CredentialSetRecord) -> Result<(), StorageError> {
        let mut items = self
            .credentials
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        items.push(record);
        Ok(())
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn list_credentials(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        vendor: Option<VendorKind>,
    ) -> Result<Vec<CredentialSetRecord>, StorageError> {
        ensure_site_scope(ctx, site_id)?;
        let items = self
            .credentials
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(items
            .iter()
            .filter(|item| item.tenant_id == ctx.tenant_id && item.site_id == site_id)
            .filter(|item| vendor.is_none_or(|vendor| item.vendor == vendor))
            .cloned()
            .collect())
    }

    async fn upsert_credentials(
        &self,
        ctx: &TenantContext,
        record: CredentialSetRecord,
    ) -> Result<CredentialSetRecord, StorageError> {
        ensure_site_scope(ctx, &record.site_id)?;
        if record.tenant_id != ctx.tenant_id {
            return Err(StorageError::new("tenant mismatch"));
        }
        let mut items = self
            .credentials
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if record.is_active {
            for item in items.iter_mut().filter(|item| {
                item.tenant_id == record.tenant_id
                    && item.site_id == record.site_id
                    && item.vendor == record.vendor
                    && item.credential_id != record.credential_id
            }) {
                item.is_active = false;
                item.updated_at_ms = record.updated_at_ms;
            }
        }
        match items
            .iter_mut()
            .find(|item| item.credential_id == record.credential_id)
        {
            Some(existing) => *existing = record.clone(),
            None => items.push(record.clone()),
        }
        Ok(record)
    }
}
