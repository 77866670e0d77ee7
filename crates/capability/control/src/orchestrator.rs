use crate::alerts::{SubscriptionAlert, SubscriptionAlerts};
use crate::error::ControlError;
use crate::lease::{DeviceLeases, lease_key};
use crate::limiter::CredentialLimiter;
use domain::{AccessAction, CommandErrorKind, LockAction, LockState, TenantContext, VendorKind};
use harbor_storage::{
    AccessLogRecord, AccessLogStore, CredentialSetRecord, CredentialStore, KeyProvisioned,
    LockDeviceRecord, LockDeviceStore, LockTelemetryUpdate, active_lock_devices, now_epoch_ms,
};
use harbor_telemetry::{
    record_adapter_latency_ms, record_command_failure, record_command_issued,
    record_command_success, record_key_setup_rejection, record_manual_correction,
    record_recheck_run, record_status_refresh, record_subscription_expired, record_sweep_run,
};
use harbor_vendor::{
    AdapterRegistry, LockStatus, ProvisionedKey, VendorCredentials, VendorDevice, VendorError,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// 编排配置。
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// 单次厂商调用上限，超时按 `VENDOR_UNAVAILABLE` 处理。
    pub adapter_timeout: Duration,
    /// 开关锁成功后延迟复查状态的等待时间（毫秒），0 表示不复查。
    pub recheck_delay_ms: u64,
    /// 站点批量刷新的并发上限（限制在 1..=8）。
    pub sweep_concurrency: usize,
    /// 每套凭证同时进行的厂商调用上限。
    pub credential_concurrency: usize,
    /// 需要先完成密钥配置才能开关锁的 Tuya 品类。
    pub key_setup_categories: Vec<String>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            adapter_timeout: Duration::from_secs(12),
            recheck_delay_ms: 4_000,
            sweep_concurrency: 6,
            credential_concurrency: 2,
            key_setup_categories: vec!["jtmspro".to_string(), "jtmsbh".to_string()],
        }
    }
}

/// 命令结果（调用方据此渲染，失败分类在 `error_kind`）。
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub device_id: String,
    pub action: AccessAction,
    pub success: bool,
    /// `Some(true)` 已上锁，`Some(false)` 已开锁，`None` 未知
    pub is_locked: Option<bool>,
    /// `is_locked` 是否由状态读取或人工纠正确认（否则为乐观推断）
    pub confirmed: bool,
    pub online: Option<bool>,
    pub battery_level: Option<u8>,
    pub diagnostics: Option<Value>,
    pub error_kind: Option<CommandErrorKind>,
    pub error_detail: Option<String>,
}

impl CommandResult {
    fn succeeded(device_id: &str, action: AccessAction) -> Self {
        Self {
            device_id: device_id.to_string(),
            action,
            success: true,
            is_locked: None,
            confirmed: false,
            online: None,
            battery_level: None,
            diagnostics: None,
            error_kind: None,
            error_detail: None,
        }
    }

    fn failed(
        device_id: &str,
        action: AccessAction,
        kind: CommandErrorKind,
        detail: String,
    ) -> Self {
        Self {
            success: false,
            error_kind: Some(kind),
            error_detail: Some(detail),
            ..Self::succeeded(device_id, action)
        }
    }
}

/// 站点批量刷新结果。
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    pub site_id: String,
    pub total: usize,
    pub refreshed: usize,
    pub failed: Vec<SweepFailure>,
}

#[derive(Debug, Clone)]
pub struct SweepFailure {
    pub device_id: String,
    pub error_kind: Option<CommandErrorKind>,
    pub detail: String,
}

enum AdapterOutput {
    Accepted,
    Status(LockStatus),
    Diagnostics(Value),
    Key(ProvisionedKey),
}

/// 门锁编排服务。
///
/// 每条命令：租约内解析设备、前置条件检查、按厂商分发、写状态、写一条门禁日志。
#[derive(Clone)]
pub struct LockOrchestrator {
    devices: Arc<dyn LockDeviceStore>,
    credentials: Arc<dyn CredentialStore>,
    logs: Arc<dyn AccessLogStore>,
    adapters: AdapterRegistry,
    leases: Arc<DeviceLeases>,
    limiter: Arc<CredentialLimiter>,
    alerts: Arc<SubscriptionAlerts>,
    config: OrchestratorConfig,
}

impl LockOrchestrator {
    pub fn new(
        devices: Arc<dyn LockDeviceStore>,
        credentials: Arc<dyn CredentialStore>,
        logs: Arc<dyn AccessLogStore>,
        adapters: AdapterRegistry,
    ) -> Self {
        Self::new_with_config(devices, credentials, logs, adapters, OrchestratorConfig::default())
    }

    pub fn new_with_config(
        devices: Arc<dyn LockDeviceStore>,
        credentials: Arc<dyn CredentialStore>,
        logs: Arc<dyn AccessLogStore>,
        adapters: AdapterRegistry,
        config: OrchestratorConfig,
    ) -> Self {
        let limiter = Arc::new(CredentialLimiter::new(config.credential_concurrency));
        Self {
            devices,
            credentials,
            logs,
            adapters,
            leases: Arc::new(DeviceLeases::new()),
            limiter,
            alerts: Arc::new(SubscriptionAlerts::new()),
            config,
        }
    }

    /// 下发命令（lock / unlock / status / diagnostics / provision_key）。
    pub async fn issue_command(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
        action: LockAction,
    ) -> Result<CommandResult, ControlError> {
        record_command_issued();
        info!(
            target: "harbor.control",
            tenant_id = %ctx.tenant_id,
            site_id = %site_id,
            device_id = %device_id,
            action = action.as_str(),
            actor = %ctx.actor_name(),
            "lock_command_requested"
        );
        let _lease = self
            .leases
            .acquire(&lease_key(&ctx.tenant_id, site_id, device_id))
            .await;

        let access_action = action.access_action();
        let device = match self.active_device(ctx, site_id, device_id).await {
            Ok(Some(device)) => device,
            Ok(None) => {
                let result = CommandResult::failed(
                    device_id,
                    access_action,
                    CommandErrorKind::DeviceNotFound,
                    "device not registered or inactive".to_string(),
                );
                return self.finish(ctx, site_id, "", result).await;
            }
            Err(err) => {
                let result = self.storage_failure(ctx, site_id, device_id, access_action, &err);
                return self.finish(ctx, site_id, "", result).await;
            }
        };

        if action.is_actuation() && self.key_setup_blocks(&device) {
            record_key_setup_rejection();
            let result = CommandResult::failed(
                device_id,
                access_action,
                CommandErrorKind::KeySetupRequired,
                "key setup must be completed before lock/unlock".to_string(),
            );
            return self.finish(ctx, site_id, &device.location, result).await;
        }

        let result = match self.call_vendor(ctx, &device, action).await {
            Ok((_, Ok(output))) => {
                self.alerts.clear(&ctx.tenant_id, site_id, device.vendor);
                match self.apply_success(ctx, &device, action, output).await {
                    Ok(result) => result,
                    Err(err) => {
                        self.storage_failure(ctx, site_id, device_id, access_action, &err)
                    }
                }
            }
            Ok((credential_id, Err(err))) => {
                if err.kind == CommandErrorKind::SubscriptionExpired {
                    self.raise_subscription_alert(ctx, &device, credential_id, &err);
                }
                CommandResult::failed(device_id, access_action, err.kind, err.detail)
            }
            Err(err) => self.storage_failure(ctx, site_id, device_id, access_action, &err),
        };

        if result.success && action.is_actuation() && self.config.recheck_delay_ms > 0 {
            self.spawn_recheck(ctx.clone(), site_id.to_string(), device_id.to_string());
        }
        self.finish(ctx, site_id, &device.location, result).await
    }

    /// 读取设备状态并写回缓存；只有这条读路径会确认 `lock_state`。
    pub async fn refresh_status(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<CommandResult, ControlError> {
        self.issue_command(ctx, site_id, device_id, LockAction::Status)
            .await
    }

    pub async fn provision_key(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<CommandResult, ControlError> {
        self.issue_command(ctx, site_id, device_id, LockAction::ProvisionKey)
            .await
    }

    /// 刷新站点下所有生效门锁；单台失败不影响其他设备。
    pub async fn refresh_all(
        &self,
        ctx: &TenantContext,
        site_id: &str,
    ) -> Result<SweepReport, ControlError> {
        record_sweep_run();
        let started_at = Instant::now();
        let devices = active_lock_devices(self.devices.as_ref(), ctx, site_id).await?;
        let mut report = SweepReport {
            site_id: site_id.to_string(),
            total: devices.len(),
            ..SweepReport::default()
        };
        let pool = Arc::new(Semaphore::new(self.config.sweep_concurrency.clamp(1, 8)));
        let mut tasks = JoinSet::new();
        for device in devices {
            let Ok(permit) = pool.clone().acquire_owned().await else {
                break;
            };
            let this = self.clone();
            let ctx = ctx.clone();
            let site_id = site_id.to_string();
            tasks.spawn(async move {
                let _permit = permit;
                let outcome = this
                    .refresh_status(&ctx, &site_id, &device.device_id)
                    .await;
                (device.device_id, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(result))) if result.success => report.refreshed += 1,
                Ok((device_id, Ok(result))) => report.failed.push(SweepFailure {
                    device_id,
                    error_kind: result.error_kind,
                    detail: result.error_detail.unwrap_or_default(),
                }),
                Ok((device_id, Err(err))) => report.failed.push(SweepFailure {
                    device_id,
                    error_kind: None,
                    detail: err.to_string(),
                }),
                Err(err) => report.failed.push(SweepFailure {
                    device_id: String::new(),
                    error_kind: Some(CommandErrorKind::Unknown),
                    detail: err.to_string(),
                }),
            }
        }
        report.failed.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        info!(
            target: "harbor.control",
            tenant_id = %ctx.tenant_id,
            site_id = %site_id,
            total = report.total,
            refreshed = report.refreshed,
            failed = report.failed.len(),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "lock_sweep_completed"
        );
        Ok(report)
    }

    /// 人工纠正：不调用厂商，直接写入并视为已确认。
    pub async fn manual_correction(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
        state: LockState,
    ) -> Result<CommandResult, ControlError> {
        let Some(is_locked) = state.is_locked() else {
            return Err(ControlError::InvalidRequest(
                "manual correction requires locked or unlocked".to_string(),
            ));
        };
        record_command_issued();
        let _lease = self
            .leases
            .acquire(&lease_key(&ctx.tenant_id, site_id, device_id))
            .await;
        let action = AccessAction::ManualCorrection;
        let device = match self.active_device(ctx, site_id, device_id).await {
            Ok(Some(device)) => device,
            Ok(None) => {
                let result = CommandResult::failed(
                    device_id,
                    action,
                    CommandErrorKind::DeviceNotFound,
                    "device not registered or inactive".to_string(),
                );
                return self.finish(ctx, site_id, "", result).await;
            }
            Err(err) => {
                let result = self.storage_failure(ctx, site_id, device_id, action, &err);
                return self.finish(ctx, site_id, "", result).await;
            }
        };

        let update = LockTelemetryUpdate {
            lock_state: Some(state),
            lock_state_confirmed: true,
            ts_ms: now_epoch_ms(),
            ..LockTelemetryUpdate::default()
        };
        let updated = match self
            .devices
            .apply_telemetry(ctx, site_id, device_id, update)
            .await
        {
            Ok(updated) => updated.unwrap_or(device),
            Err(err) => {
                let result = self.storage_failure(ctx, site_id, device_id, action, &ControlError::from(err));
                return self.finish(ctx, site_id, &device.location, result).await;
            }
        };
        record_manual_correction();
        info!(
            target: "harbor.control",
            tenant_id = %ctx.tenant_id,
            site_id = %site_id,
            device_id = %device_id,
            state = state.as_str(),
            actor = %ctx.actor_name(),
            "lock_state_manually_corrected"
        );
        let result = CommandResult {
            is_locked: Some(is_locked),
            confirmed: true,
            online: Some(updated.online),
            battery_level: updated.battery_level,
            ..CommandResult::succeeded(device_id, action)
        };
        self.finish(ctx, site_id, &updated.location, result).await
    }

    /// 设备最近一条门禁日志。
    pub async fn last_activity(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<Option<AccessLogRecord>, ControlError> {
        Ok(self.logs.last_access_log(ctx, site_id, device_id).await?)
    }

    pub fn subscription_alerts(
        &self,
        ctx: &TenantContext,
        site_id: &str,
    ) -> Vec<SubscriptionAlert> {
        self.alerts.list(&ctx.tenant_id, site_id)
    }

    /// 凭证被管理员修改后作废适配器令牌。
    pub fn invalidate_credentials(&self, vendor: VendorKind, credential_id: &str) {
        self.adapters.invalidate_credentials(vendor, credential_id);
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    async fn active_device(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<Option<LockDeviceRecord>, ControlError> {
        Ok(self
            .devices
            .find_lock_device(ctx, site_id, device_id)
            .await?
            .filter(|device| device.is_active))
    }

    fn key_setup_blocks(&self, device: &LockDeviceRecord) -> bool {
        if device.vendor != VendorKind::Tuya {
            return false;
        }
        let key_category = device.category.as_deref().is_some_and(|category| {
            self.config
                .key_setup_categories
                .iter()
                .any(|item| item == category)
        });
        device.requires_key_setup || (key_category && device.local_key.is_none())
    }

    /// 解析凭证并在超时与凭证并发上限内调用适配器。
    ///
    /// 返回使用的 credential_id（解析失败时为空）与厂商调用结果。
    async fn call_vendor(
        &self,
        ctx: &TenantContext,
        device: &LockDeviceRecord,
        action: LockAction,
    ) -> Result<(String, Result<AdapterOutput, VendorError>), ControlError> {
        let credentials = match self.resolve_credentials(ctx, device).await? {
            Ok(credentials) => credentials,
            Err(err) => return Ok((String::new(), Err(err))),
        };
        let Some(adapter) = self.adapters.get(device.vendor) else {
            return Ok((
                credentials.credential_id,
                Err(VendorError::unknown(format!(
                    "no adapter registered for {}",
                    device.vendor.as_str()
                ))),
            ));
        };
        let target = vendor_device(device);
        let _permit = self.limiter.acquire(&credentials.credential_id).await;
        let started_at = Instant::now();
        let call = async {
            match action {
                LockAction::Lock => adapter
                    .lock(&credentials, &target)
                    .await
                    .map(|_| AdapterOutput::Accepted),
                LockAction::Unlock => adapter
                    .unlock(&credentials, &target)
                    .await
                    .map(|_| AdapterOutput::Accepted),
                LockAction::Status => adapter
                    .status(&credentials, &target)
                    .await
                    .map(AdapterOutput::Status),
                LockAction::Diagnostics => adapter
                    .diagnostics(&credentials, &target)
                    .await
                    .map(AdapterOutput::Diagnostics),
                LockAction::ProvisionKey => adapter
                    .provision_key(&credentials, &target)
                    .await
                    .map(AdapterOutput::Key),
            }
        };
        let outcome = match tokio::time::timeout(self.config.adapter_timeout, call).await {
            Ok(outcome) => outcome,
            Err(_) => Err(VendorError::unavailable(format!(
                "vendor call timed out after {} ms",
                self.config.adapter_timeout.as_millis()
            ))),
        };
        let latency_ms = started_at.elapsed().as_millis() as u64;
        record_adapter_latency_ms(latency_ms);
        if let Err(err) = &outcome {
            warn!(
                target: "harbor.control",
                tenant_id = %ctx.tenant_id,
                site_id = %device.site_id,
                device_id = %device.device_id,
                vendor = device.vendor.as_str(),
                action = action.as_str(),
                error_kind = %err.kind,
                detail = %err.detail,
                latency_ms,
                "lock_vendor_call_failed"
            );
        }
        Ok((credentials.credential_id, outcome))
    }

    /// 站点 + 厂商下必须恰好一套生效凭证。
    async fn resolve_credentials(
        &self,
        ctx: &TenantContext,
        device: &LockDeviceRecord,
    ) -> Result<Result<VendorCredentials, VendorError>, ControlError> {
        let mut active: Vec<CredentialSetRecord> = self
            .credentials
            .list_credentials(ctx, &device.site_id, Some(device.vendor))
            .await?
            .into_iter()
            .filter(|item| item.is_active)
            .collect();
        if active.len() > 1 {
            return Ok(Err(VendorError::auth_failed(format!(
                "multiple active credential sets for {}",
                device.vendor.as_str()
            ))));
        }
        let Some(record) = active.pop() else {
            return Ok(Err(VendorError::auth_failed(format!(
                "no active credential set for {}",
                device.vendor.as_str()
            ))));
        };
        Ok(Ok(VendorCredentials {
            credential_id: record.credential_id,
            client_id: record.client_id,
            client_secret: record.client_secret.into(),
            region: record.region,
            base_url: record.base_url,
        }))
    }

    async fn apply_success(
        &self,
        ctx: &TenantContext,
        device: &LockDeviceRecord,
        action: LockAction,
        output: AdapterOutput,
    ) -> Result<CommandResult, ControlError> {
        let site_id = device.site_id.as_str();
        let device_id = device.device_id.as_str();
        let ts_ms = now_epoch_ms();
        let mut result = CommandResult::succeeded(device_id, action.access_action());
        match output {
            AdapterOutput::Accepted => {
                // 云端受理即乐观写入目标状态，等待复查确认
                let target = action.target_state();
                let update = LockTelemetryUpdate {
                    lock_state: target,
                    ts_ms,
                    ..LockTelemetryUpdate::default()
                };
                let updated = self
                    .devices
                    .apply_telemetry(ctx, site_id, device_id, update)
                    .await?;
                result.is_locked = target.and_then(|state| state.is_locked());
                result.online = updated.as_ref().map(|item| item.online);
                result.battery_level = updated.and_then(|item| item.battery_level);
            }
            AdapterOutput::Status(status) => {
                self.write_status(ctx, device, status, ts_ms).await?;
                result.is_locked = status.is_locked;
                result.confirmed = status.is_locked.is_some();
                result.online = status.online;
                result.battery_level = status.battery_level;
            }
            AdapterOutput::Diagnostics(report) => {
                result.diagnostics = Some(report);
            }
            AdapterOutput::Key(key) => {
                let provisioned = KeyProvisioned {
                    local_key: key.local_key,
                    key_set_at_ms: ts_ms,
                };
                self.devices
                    .record_key_provisioned(ctx, site_id, device_id, provisioned)
                    .await?;
                info!(
                    target: "harbor.control",
                    tenant_id = %ctx.tenant_id,
                    site_id = %site_id,
                    device_id = %device_id,
                    "lock_key_provisioned"
                );
            }
        }
        Ok(result)
    }

    /// 状态读取写回：读取成功即覆盖锁状态，缺失时记为 unknown 且不确认。
    async fn write_status(
        &self,
        ctx: &TenantContext,
        device: &LockDeviceRecord,
        status: LockStatus,
        ts_ms: i64,
    ) -> Result<(), ControlError> {
        let state = LockState::from_is_locked(status.is_locked);
        let update = LockTelemetryUpdate {
            lock_state: Some(state),
            lock_state_confirmed: state.is_known(),
            online: status.online,
            battery_level: status.battery_level,
            last_status_check_ms: Some(ts_ms),
            ts_ms,
        };
        self.devices
            .apply_telemetry(ctx, &device.site_id, &device.device_id, update)
            .await?;
        info!(
            target: "harbor.control",
            tenant_id = %ctx.tenant_id,
            site_id = %device.site_id,
            device_id = %device.device_id,
            lock_state = state.as_str(),
            online = ?status.online,
            battery_level = ?status.battery_level,
            "lock_status_refreshed"
        );
        Ok(())
    }

    fn raise_subscription_alert(
        &self,
        ctx: &TenantContext,
        device: &LockDeviceRecord,
        credential_id: String,
        err: &VendorError,
    ) {
        record_subscription_expired();
        self.alerts.raise(
            &ctx.tenant_id,
            SubscriptionAlert {
                site_id: device.site_id.clone(),
                vendor: device.vendor,
                credential_id,
                detail: err.detail.clone(),
                raised_at_ms: now_epoch_ms(),
            },
        );
        warn!(
            target: "harbor.control",
            tenant_id = %ctx.tenant_id,
            site_id = %device.site_id,
            vendor = device.vendor.as_str(),
            "lock_vendor_subscription_expired"
        );
    }

    /// 存储失败也要落一条失败日志，分类为 `UNKNOWN`。
    fn storage_failure(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
        action: AccessAction,
        err: &ControlError,
    ) -> CommandResult {
        warn!(
            target: "harbor.control",
            tenant_id = %ctx.tenant_id,
            site_id = %site_id,
            device_id = %device_id,
            action = action.as_str(),
            error = %err,
            "lock_command_storage_failed"
        );
        CommandResult::failed(device_id, action, CommandErrorKind::Unknown, err.to_string())
    }

    /// 写门禁日志并计数；每条命令恰好调用一次。
    async fn finish(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        location: &str,
        result: CommandResult,
    ) -> Result<CommandResult, ControlError> {
        let record = AccessLogRecord {
            log_id: uuid::Uuid::new_v4().to_string(),
            tenant_id: ctx.tenant_id.clone(),
            site_id: site_id.to_string(),
            device_id: result.device_id.clone(),
            actor: ctx.actor_name().to_string(),
            action: result.action,
            location: location.to_string(),
            success: result.success,
            error_kind: result.error_kind,
            error_message: result.error_detail.clone(),
            ts_ms: now_epoch_ms(),
        };
        self.logs.append_access_log(ctx, record).await?;

        if result.action == AccessAction::Status {
            record_status_refresh(result.success);
        }
        if result.success {
            record_command_success();
        } else {
            record_command_failure();
        }
        info!(
            target: "harbor.control",
            tenant_id = %ctx.tenant_id,
            site_id = %site_id,
            device_id = %result.device_id,
            action = result.action.as_str(),
            success = result.success,
            error_kind = ?result.error_kind.map(|kind| kind.code()),
            "lock_command_completed"
        );
        Ok(result)
    }

    fn spawn_recheck(&self, ctx: TenantContext, site_id: String, device_id: String) {
        let this = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(this.config.recheck_delay_ms)).await;
            if let Err(err) = this.recheck(&ctx, &site_id, &device_id).await {
                warn!(
                    target: "harbor.control",
                    tenant_id = %ctx.tenant_id,
                    site_id = %site_id,
                    device_id = %device_id,
                    error = %err,
                    "lock_recheck_failed"
                );
            }
        });
    }

    /// 延迟复查：成功则确认状态；失败保留乐观值，不写门禁日志。
    async fn recheck(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<(), ControlError> {
        record_recheck_run();
        let _lease = self
            .leases
            .acquire(&lease_key(&ctx.tenant_id, site_id, device_id))
            .await;
        let Some(device) = self.active_device(ctx, site_id, device_id).await? else {
            return Ok(());
        };
        let (_, outcome) = self.call_vendor(ctx, &device, LockAction::Status).await?;
        match outcome {
            Ok(AdapterOutput::Status(status)) => {
                self.alerts.clear(&ctx.tenant_id, site_id, device.vendor);
                self.write_status(ctx, &device, status, now_epoch_ms()).await
            }
            Ok(_) => Ok(()),
            Err(err) => {
                info!(
                    target: "harbor.control",
                    tenant_id = %ctx.tenant_id,
                    site_id = %site_id,
                    device_id = %device_id,
                    error_kind = %err.kind,
                    "lock_recheck_kept_optimistic_state"
                );
                Ok(())
            }
        }
    }
}

fn vendor_device(device: &LockDeviceRecord) -> VendorDevice {
    VendorDevice {
        device_id: device.device_id.clone(),
        vendor_device_id: device.vendor_device_id.clone(),
        category: device.category.clone(),
        local_key: device.local_key.clone(),
    }
}
