//! 门禁日志内存实现
//!
//! 只追加：不提供修改与删除。

use crate::error::StorageError;
use crate::models::{AccessLogQuery, AccessLogRecord};
use crate::traits::AccessLogStore;
use crate::validation::ensure_site_scope;
use domain::TenantContext;
use std::sync::RwLock;

/// 门禁日志内存存储
pub struct InMemoryAccessLogStore {
    logs: RwLock<Vec<AccessLogRecord>>,
}

impl InMemoryAccessLogStore {
    pub fn new() -> Self {
        Self {
            logs: RwLock::new(Vec::new()),
        }
    }

    /// 全部日志条数（测试断言用）。
    pub fn len(&self) -> usize {
        self.logs.read().map(|logs| logs.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryAccessLogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AccessLogStore for InMemoryAccessLogStore {
    async fn append_access_log(
        &self,
        ctx: &TenantContext,
        record: AccessLogRecord,
    ) -> Result<AccessLogRecord, StorageError> {
        if record.tenant_id != ctx.tenant_id {
            return Err(StorageError::new("tenant mismatch"));
        }
        ensure_site_scope(ctx, &record.site_id)?;
        let mut logs = self
            .logs
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        logs.push(record.clone());
        Ok(record)
    }

    async fn list_access_logs(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        query: AccessLogQuery,
    ) -> Result<Vec<AccessLogRecord>, StorageError> {
        ensure_site_scope(ctx, site_id)?;
        let limit = query.limit.max(0) as usize;
        let logs = self
            .logs
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut items: Vec<AccessLogRecord> = logs
            .iter()
            .filter(|item| item.tenant_id == ctx.tenant_id && item.site_id == site_id)
            .filter(|item| match query.device_id.as_deref() {
                Some(device_id) => item.device_id == device_id,
                None => true,
            })
            .filter(|item| match query.from_ms {
                Some(from) => item.ts_ms >= from,
                None => true,
            })
            .filter(|item| match query.to_ms {
                Some(to) => item.ts_ms <= to,
                None => true,
            })
            .cloned()
            .collect();
        // 同毫秒内保持写入顺序的倒序
        items.reverse();
        items.sort_by(|a, b| b.ts_ms.cmp(&a.ts_ms));
        if limit > 0 && items.len() > limit {
            items.truncate(limit);
        }
        Ok(items)
    }

    async fn last_access_log(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<Option<AccessLogRecord>, StorageError> {
        let query = AccessLogQuery {
            device_id: Some(device_id.to_string()),
            limit: 1,
            ..AccessLogQuery::default()
        };
        Ok(self
            .list_access_logs(ctx, site_id, query)
            .await?
            .into_iter()
            .next())
    }

    async fn count_access_logs(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<i64, StorageError> {
        ensure_site_scope(ctx, site_id)?;
        let logs = self
            .logs
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let count = logs
            .iter()
            .filter(|item| {
                item.tenant_id == ctx.tenant_id
                    && item.site_id == site_id
                    && item.device_id == device_id
            })
            .count();
        Ok(count as i64)
    }
}
