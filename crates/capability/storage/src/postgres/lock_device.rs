//! Postgres 门锁设备存储实现
//!
//! 设计要点：
//! - 所有操作都带有租户和站点作用域验证
//! - 枚举字段以稳定字符串编码落库
//! - 更新使用 `coalesce` + `returning`，一次往返

use crate::error::StorageError;
use crate::models::{KeyProvisioned, LockDeviceRecord, LockDeviceUpdate, LockTelemetryUpdate};
use crate::traits::LockDeviceStore;
use crate::validation::ensure_site_scope;
use domain::{LockState, TenantContext, VendorKind};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const DEVICE_COLUMNS: &str = "device_id, tenant_id, site_id, vendor, vendor_device_id, local_key, \
     name, location, manufacturer, model, category, lock_state, lock_state_updated_at_ms, \
     lock_state_confirmed_at_ms, online, battery_level, last_status_check_ms, is_active, \
     requires_key_setup, key_set_at_ms, created_at_ms, updated_at_ms";

pub struct PgLockDeviceStore {
    pub pool: PgPool,
}

impl PgLockDeviceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

fn device_from_row(row: &PgRow) -> Result<LockDeviceRecord, StorageError> {
    let vendor: String = row.try_get("vendor")?;
    let lock_state: String = row.try_get("lock_state")?;
    let battery_level: Option<i16> = row.try_get("battery_level")?;
    Ok(LockDeviceRecord {
        device_id: row.try_get("device_id")?,
        tenant_id: row.try_get("tenant_id")?,
        site_id: row.try_get("site_id")?,
        vendor: VendorKind::parse(&vendor)
            .ok_or_else(|| StorageError::invalid_value("vendor", &vendor))?,
        vendor_device_id: row.try_get("vendor_device_id")?,
        local_key: row.try_get("local_key")?,
        name: row.try_get("name")?,
        location: row.try_get("location")?,
        manufacturer: row.try_get("manufacturer")?,
        model: row.try_get("model")?,
        category: row.try_get("category")?,
        lock_state: LockState::parse(&lock_state)
            .ok_or_else(|| StorageError::invalid_value("lock_state", &lock_state))?,
        lock_state_updated_at_ms: row.try_get("lock_state_updated_at_ms")?,
        lock_state_confirmed_at_ms: row.try_get("lock_state_confirmed_at_ms")?,
        online: row.try_get("online")?,
        battery_level: battery_level.map(|value| value.clamp(0, 100) as u8),
        last_status_check_ms: row.try_get("last_status_check_ms")?,
        is_active: row.try_get("is_active")?,
        requires_key_setup: row.try_get("requires_key_setup")?,
        key_set_at_ms: row.try_get("key_set_at_ms")?,
        created_at_ms: row.try_get("created_at_ms")?,
        updated_at_ms: row.try_get("updated_at_ms")?,
    })
}

#[async_trait::async_trait]
impl LockDeviceStore for PgLockDeviceStore {
    async fn list_lock_devices(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        active_only: bool,
    ) -> Result<Vec<LockDeviceRecord>, StorageError> {
        ensure_site_scope(ctx, site_id)?;
        let sql = format!(
            "select {} from lock_devices where tenant_id = $1 and site_id = $2 \
             and (is_active or not $3) order by device_id",
            DEVICE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(&ctx.tenant_id)
            .bind(site_id)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(device_from_row).collect()
    }

    async fn find_lock_device(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<Option<LockDeviceRecord>, StorageError> {
        ensure_site_scope(ctx, site_id)?;
        let sql = format!(
            "select {} from lock_devices where tenant_id = $1 and site_id = $2 and device_id = $3",
            DEVICE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&ctx.tenant_id)
            .bind(site_id)
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(device_from_row).transpose()
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
        let sql = format!(
            "insert into lock_devices ({}) values \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, \
             $19, $20, $21, $22)",
            DEVICE_COLUMNS
        );
        sqlx::query(&sql)
            .bind(&record.device_id)
            .bind(&record.tenant_id)
            .bind(&record.site_id)
            .bind(record.vendor.as_str())
            .bind(&record.vendor_device_id)
            .bind(&record.local_key)
            .bind(&record.name)
            .bind(&record.location)
            .bind(&record.manufacturer)
            .bind(&record.model)
            .bind(&record.category)
            .bind(record.lock_state.as_str())
            .bind(record.lock_state_updated_at_ms)
            .bind(record.lock_state_confirmed_at_ms)
            .bind(record.online)
            .bind(record.battery_level.map(i16::from))
            .bind(record.last_status_check_ms)
            .bind(record.is_active)
            .bind(record.requires_key_setup)
            .bind(record.key_set_at_ms)
            .bind(record.created_at_ms)
            .bind(record.updated_at_ms)
            .execute(&self.pool)
            .await?;
        Ok(record)
    }

    async fn update_lock_device(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
        update: LockDeviceUpdate,
    ) -> Result<Option<LockDeviceRecord>, StorageError> {
        ensure_site_scope(ctx, site_id)?;
        let sql = format!(
            "update lock_devices set \
             name = coalesce($1, name), \
             location = coalesce($2, location), \
             manufacturer = coalesce($3, manufacturer), \
             model = coalesce($4, model), \
             category = coalesce($5, category), \
             vendor_device_id = coalesce($6, vendor_device_id), \
             is_active = coalesce($7, is_active), \
             requires_key_setup = coalesce($8, requires_key_setup), \
             updated_at_ms = $9 \
             where tenant_id = $10 and site_id = $11 and device_id = $12 \
             returning {}",
            DEVICE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(update.name)
            .bind(update.location)
            .bind(update.manufacturer)
            .bind(update.model)
            .bind(update.category)
            .bind(update.vendor_device_id)
            .bind(update.is_active)
            .bind(update.requires_key_setup)
            .bind(crate::now_epoch_ms())
            .bind(&ctx.tenant_id)
            .bind(site_id)
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(device_from_row).transpose()
    }

    async fn apply_telemetry(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
        update: LockTelemetryUpdate,
    ) -> Result<Option<LockDeviceRecord>, StorageError> {
        ensure_site_scope(ctx, site_id)?;
        // $1 新状态（可空）、$2 是否确认、$3 时间戳
        let sql = format!(
            "update lock_devices set \
             lock_state_updated_at_ms = case \
               when $1::text is null then lock_state_updated_at_ms \
               when $2 or lock_state <> $1 or lock_state_updated_at_ms is null then $3 \
               else lock_state_updated_at_ms end, \
             lock_state_confirmed_at_ms = case \
               when $1::text is not null and $2 then $3 \
               else lock_state_confirmed_at_ms end, \
             lock_state = coalesce($1, lock_state), \
             online = coalesce($4, online), \
             battery_level = coalesce($5, battery_level), \
             last_status_check_ms = coalesce($6, last_status_check_ms), \
             updated_at_ms = $3 \
             where tenant_id = $7 and site_id = $8 and device_id = $9 \
             returning {}",
            DEVICE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(update.lock_state.map(|state| state.as_str()))
            .bind(update.lock_state_confirmed)
            .bind(update.ts_ms)
            .bind(update.online)
            .bind(update.battery_level.map(|value| i16::from(value.min(100))))
            .bind(update.last_status_check_ms)
            .bind(&ctx.tenant_id)
            .bind(site_id)
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(device_from_row).transpose()
    }

    async fn record_key_provisioned(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
        key: KeyProvisioned,
    ) -> Result<Option<LockDeviceRecord>, StorageError> {
        ensure_site_scope(ctx, site_id)?;
        let sql = format!(
            "update lock_devices set local_key = $1, key_set_at_ms = $2, \
             requires_key_setup = false, updated_at_ms = $2 \
             where tenant_id = $3 and site_id = $4 and device_id = $5 \
             returning {}",
            DEVICE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&key.local_key)
            .bind(key.key_set_at_ms)
            .bind(&ctx.tenant_id)
            .bind(site_id)
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(device_from_row).transpose()
    }

    async fn purge_lock_device(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<bool, StorageError> {
        ensure_site_scope(ctx, site_id)?;
        // 数据库侧再次确认无日志引用
        let result = sqlx::query(
            "delete from lock_devices d where d.tenant_id = $1 and d.site_id = $2 \
             and d.device_id = $3 and not exists \
             (select 1 from lock_access_logs l where l.tenant_id = d.tenant_id \
              and l.device_id = d.device_id)",
        )
        .bind(&ctx.tenant_id)
        .bind(site_id)
        .bind(device_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
