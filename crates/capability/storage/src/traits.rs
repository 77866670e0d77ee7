//! 存储接口 Trait 定义
//!
//! 定义所有资源存储的异步接口：
//! - SiteStore：站点存储（租户归属校验）
//! - LockDeviceStore：门锁设备登记
//! - CredentialStore：厂商凭证
//! - AccessLogStore：门禁日志（只追加）
//!
//! 设计原则：
//! - 所有接口显式接收 TenantContext
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{
    AccessLogQuery, AccessLogRecord, CredentialSetRecord, KeyProvisioned, LockDeviceRecord,
    LockDeviceUpdate, LockTelemetryUpdate, SiteRecord,
};
use async_trait::async_trait;
use domain::{TenantContext, VendorKind};

/// 站点存储接口
#[async_trait]
pub trait SiteStore: Send + Sync {
    /// 列出当前租户的所有站点
    async fn list_sites(&self, ctx: &TenantContext) -> Result<Vec<SiteRecord>, StorageError>;

    /// 查找指定站点
    async fn find_site(
        &self,
        ctx: &TenantContext,
        site_id: &str,
    ) -> Result<Option<SiteRecord>, StorageError>;

    /// 创建站点
    async fn create_site(
        &self,
        ctx: &TenantContext,
        record: SiteRecord,
    ) -> Result<SiteRecord, StorageError>;

    /// 验证站点归属当前租户
    async fn site_belongs_to_tenant(
        &self,
        ctx: &TenantContext,
        site_id: &str,
    ) -> Result<bool, StorageError>;
}

/// 门锁设备存储接口
///
/// 不提供硬删除：有日志历史的设备只能停用，见 [`crate::registry::remove_lock_device`]。
#[async_trait]
pub trait LockDeviceStore: Send + Sync {
    /// 列出站点下的门锁（`active_only` 为 true 时过滤停用设备）
    async fn list_lock_devices(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        active_only: bool,
    ) -> Result<Vec<LockDeviceRecord>, StorageError>;

    /// 查找指定门锁（含停用设备）
    async fn find_lock_device(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<Option<LockDeviceRecord>, StorageError>;

    /// 登记新门锁
    async fn create_lock_device(
        &self,
        ctx: &TenantContext,
        record: LockDeviceRecord,
    ) -> Result<LockDeviceRecord, StorageError>;

    /// 更新描述字段
    async fn update_lock_device(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
        update: LockDeviceUpdate,
    ) -> Result<Option<LockDeviceRecord>, StorageError>;

    /// 写入锁状态与遥测
    async fn apply_telemetry(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
        update: LockTelemetryUpdate,
    ) -> Result<Option<LockDeviceRecord>, StorageError>;

    /// 保存密钥配置结果并清除 `requires_key_setup`
    async fn record_key_provisioned(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
        key: KeyProvisioned,
    ) -> Result<Option<LockDeviceRecord>, StorageError>;

    /// 物理删除（仅供无日志历史的设备使用）
    async fn purge_lock_device(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<bool, StorageError>;
}

/// 厂商凭证存储接口
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 列出站点下的凭证（可按厂商过滤）
    async fn list_credentials(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        vendor: Option<VendorKind>,
    ) -> Result<Vec<CredentialSetRecord>, StorageError>;

    /// 写入凭证；写入生效凭证时停用同站点同厂商的其他凭证
    async fn upsert_credentials(
        &self,
        ctx: &TenantContext,
        record: CredentialSetRecord,
    ) -> Result<CredentialSetRecord, StorageError>;
}

/// 门禁日志存储接口
#[async_trait]
pub trait AccessLogStore: Send + Sync {
    /// 追加日志
    async fn append_access_log(
        &self,
        ctx: &TenantContext,
        record: AccessLogRecord,
    ) -> Result<AccessLogRecord, StorageError>;

    /// 按时间倒序查询
    async fn list_access_logs(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        query: AccessLogQuery,
    ) -> Result<Vec<AccessLogRecord>, StorageError>;

    /// 设备最近一条日志
    async fn last_access_log(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<Option<AccessLogRecord>, StorageError>;

    /// 设备日志条数
    async fn count_access_logs(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<i64, StorageError>;
}
