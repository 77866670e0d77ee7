//! Postgres 厂商凭证存储实现
//!
//! 写入生效凭证时在同一事务内停用同站点同厂商的其他凭证，
//! 配合 `(tenant_id, site_id, vendor) where is_active` 唯一索引保证至多一套生效。

use crate::error::StorageError;
use crate::models::CredentialSetRecord;
use crate::traits::CredentialStore;
use crate::validation::ensure_site_scope;
use domain::{TenantContext, VendorKind};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgCredentialStore {
    pub pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

fn credential_from_row(row: &PgRow) -> Result<CredentialSetRecord, StorageError> {
    let vendor: String = row.try_get("vendor")?;
    Ok(CredentialSetRecord {
        credential_id: row.try_get("credential_id")?,
        tenant_id: row.try_get("tenant_id")?,
        site_id: row.try_get("site_id")?,
        vendor: VendorKind::parse(&vendor)
            .ok_or_else(|| StorageError::invalid_value("vendor", &vendor))?,
        client_id: row.try_get("client_id")?,
        client_secret: row.try_get("client_secret")?,
        region: row.try_get("region")?,
        base_url: row.try_get("base_url")?,
        is_active: row.try_get("is_active")?,
        updated_at_ms: row.try_get("updated_at_ms")?,
    })
}

#[async_trait::async_trait]
impl CredentialStore for PgCredentialStore {
    async fn list_credentials(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        vendor: Option<VendorKind>,
    ) -> Result<Vec<CredentialSetRecord>, StorageError> {
        ensure_site_scope(ctx, site_id)?;
        let rows = sqlx::query(
            "select credential_id, tenant_id, site_id, vendor, client_id, client_secret, region, \
             base_url, is_active, updated_at_ms from lock_credentials \
             where tenant_id = $1 and site_id = $2 and ($3::text is null or vendor = $3) \
             order by updated_at_ms desc",
        )
        .bind(&ctx.tenant_id)
        .bind(site_id)
        .bind(vendor.map(|vendor| vendor.as_str()))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(credential_from_row).collect()
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
        let mut tx = self.pool.begin().await?;
        if record.is_active {
            sqlx::query(
                "update lock_credentials set is_active = false, updated_at_ms = $1 \
                 where tenant_id = $2 and site_id = $3 and vendor = $4 and credential_id <> $5 \
                 and is_active",
            )
            .bind(record.updated_at_ms)
            .bind(&record.tenant_id)
            .bind(&record.site_id)
            .bind(record.vendor.as_str())
            .bind(&record.credential_id)
            .execute(&mut *tx)
            .await?;
        }
        sqlx::query(
            "insert into lock_credentials (credential_id, tenant_id, site_id, vendor, client_id, \
             client_secret, region, base_url, is_active, updated_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             on conflict (credential_id) do update set \
             client_id = excluded.client_id, client_secret = excluded.client_secret, \
             region = excluded.region, base_url = excluded.base_url, \
             is_active = excluded.is_active, updated_at_ms = excluded.updated_at_ms",
        )
        .bind(&record.credential_id)
        .bind(&record.tenant_id)
        .bind(&record.site_id)
        .bind(record.vendor.as_str())
        .bind(&record.client_id)
        .bind(&record.client_secret)
        .bind(&record.region)
        .bind(&record.base_url)
        .bind(record.is_active)
        .bind(record.updated_at_ms)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(record)
    }
}
