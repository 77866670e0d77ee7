//! Postgres 站点存储实现

use crate::error::StorageError;
use crate::models::SiteRecord;
use crate::traits::SiteStore;
use crate::validation::ensure_tenant;
use domain::TenantContext;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

pub struct PgSiteStore {
    pub pool: PgPool,
}

impl PgSiteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

fn site_from_row(row: &PgRow) -> Result<SiteRecord, StorageError> {
    Ok(SiteRecord {
        site_id: row.try_get("site_id")?,
        tenant_id: row.try_get("tenant_id")?,
        name: row.try_get("name")?,
        timezone: row.try_get("timezone")?,
    })
}

#[async_trait::async_trait]
impl SiteStore for PgSiteStore {
    async fn list_sites(&self, ctx: &TenantContext) -> Result<Vec<SiteRecord>, StorageError> {
        ensure_tenant(ctx)?;
        let rows = sqlx::query(
            "select site_id, tenant_id, name, timezone from sites where tenant_id = $1 \
             order by site_id",
        )
        .bind(&ctx.tenant_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(site_from_row).collect()
    }

    async fn find_site(
        &self,
        ctx: &TenantContext,
        site_id: &str,
    ) -> Result<Option<SiteRecord>, StorageError> {
        ensure_tenant(ctx)?;
        let row = sqlx::query(
            "select site_id, tenant_id, name, timezone from sites \
             where tenant_id = $1 and site_id = $2",
        )
        .bind(&ctx.tenant_id)
        .bind(site_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(site_from_row).transpose()
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
        sqlx::query(
            "insert into sites (site_id, tenant_id, name, timezone) values ($1, $2, $3, $4)",
        )
            .bind(&record.site_id)
            .bind(&record.tenant_id)
            .bind(&record.name)
            .bind(&record.timezone)
            .execute(&self.pool)
            .await?;
        Ok(record)
    }

    async fn site_belongs_to_tenant(
        &self,
        ctx: &TenantContext,
        site_id: &str,
    ) -> Result<bool, StorageError> {
        ensure_tenant(ctx)?;
        let row = sqlx::query("select 1 from sites where tenant_id = $1 and site_id = $2")
            .bind(&ctx.tenant_id)
            .bind(site_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}
