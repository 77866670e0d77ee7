//! Postgres 门禁日志存储实现
//!
//! 表 `lock_access_logs` 只有 insert 与 select，不提供 update/delete。

use crate::error::StorageError;
use crate::models::{AccessLogQuery, AccessLogRecord};
use crate::traits::AccessLogStore;
use crate::validation::ensure_site_scope;
use domain::{AccessAction, CommandErrorKind, TenantContext};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgAccessLogStore {
    pub pool: PgPool,
}

impl PgAccessLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

fn access_log_from_row(row: &PgRow) -> Result<AccessLogRecord, StorageError> {
    let action: String = row.try_get("action")?;
    let error_kind: Option<String> = row.try_get("error_kind")?;
    let error_kind = match error_kind {
        Some(code) => Some(
            CommandErrorKind::parse(&code)
                .ok_or_else(|| StorageError::invalid_value("error_kind", &code))?,
        ),
        None => None,
    };
    Ok(AccessLogRecord {
        log_id: row.try_get("log_id")?,
        tenant_id: row.try_get("tenant_id")?,
        site_id: row.try_get("site_id")?,
        device_id: row.try_get("device_id")?,
        actor: row.try_get("actor")?,
        action: AccessAction::parse(&action)
            .ok_or_else(|| StorageError::invalid_value("action", &action))?,
        location: row.try_get("location")?,
        success: row.try_get("success")?,
        error_kind,
        error_message: row.try_get("error_message")?,
        ts_ms: row.try_get("ts_ms")?,
    })
}

#[async_trait::async_trait]
impl AccessLogStore for PgAccessLogStore {
    async fn append_access_log(
        &self,
        ctx: &TenantContext,
        record: AccessLogRecord,
    ) -> Result<AccessLogRecord, StorageError> {
        if record.tenant_id != ctx.tenant_id {
            return Err(StorageError::new("tenant mismatch"));
        }
        ensure_site_scope(ctx, &record.site_id)?;
        sqlx::query(
            "insert into lock_access_logs (log_id, tenant_id, site_id, device_id, actor, action, \
             location, success, error_kind, error_message, ts_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(&record.log_id)
        .bind(&record.tenant_id)
        .bind(&record.site_id)
        .bind(&record.device_id)
        .bind(&record.actor)
        .bind(record.action.as_str())
        .bind(&record.location)
        .bind(record.success)
        .bind(record.error_kind.map(|kind| kind.code()))
        .bind(&record.error_message)
        .bind(record.ts_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn list_access_logs(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        query: AccessLogQuery,
    ) -> Result<Vec<AccessLogRecord>, StorageError> {
        ensure_site_scope(ctx, site_id)?;
        let limit = if query.limit > 0 { query.limit } else { i64::MAX };
        let rows = sqlx::query(
            "select log_id, tenant_id, site_id, device_id, actor, action, location, success, \
             error_kind, error_message, ts_ms from lock_access_logs \
             where tenant_id = $1 and site_id = $2 \
             and ($3::text is null or device_id = $3) \
             and ($4::bigint is null or ts_ms >= $4) \
             and ($5::bigint is null or ts_ms <= $5) \
             order by ts_ms desc, seq desc limit $6",
        )
        .bind(&ctx.tenant_id)
        .bind(site_id)
        .bind(query.device_id)
        .bind(query.from_ms)
        .bind(query.to_ms)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(access_log_from_row).collect()
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
        let row = sqlx::query(
            "select count(*) as total from lock_access_logs \
             where tenant_id = $1 and site_id = $2 and device_id = $3",
        )
        .bind(&ctx.tenant_id)
        .bind(site_id)
        .bind(device_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("total")?)
    }
}
