use async_trait::async_trait;
use domain::{AccessAction, CommandErrorKind, LockAction, LockState, TenantContext, VendorKind};
use harbor_control::{ControlError, LockOrchestrator, OrchestratorConfig};
use harbor_storage::{
    AccessLogQuery, AccessLogStore, CredentialSetRecord, CredentialStore, InMemoryAccessLogStore,
    InMemoryCredentialStore, InMemoryLockDeviceStore, KeyProvisioned, LockDeviceRecord,
    LockDeviceStore, LockDeviceUpdate, LockTelemetryUpdate, StorageError,
};
use harbor_vendor::{
    AdapterRegistry, LockStatus, ProvisionedKey, VendorAdapter, VendorCredentials, VendorDevice,
    VendorError,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 并发计数：当前在途与峰值。
#[derive(Default)]
struct Gauge {
    now: AtomicUsize,
    max: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let now = self.now.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.now.fetch_sub(1, Ordering::SeqCst);
    }

    fn max(&self) -> usize {
        self.max.load(Ordering::SeqCst)
    }
}

struct ScriptedAdapter {
    vendor: VendorKind,
    status: Mutex<Result<LockStatus, VendorError>>,
    command: Mutex<Result<(), VendorError>>,
    failing_devices: Mutex<HashMap<String, VendorError>>,
    delay: Mutex<Duration>,
    calls: AtomicUsize,
    status_calls: AtomicUsize,
    gauge: Gauge,
    shared: Arc<Gauge>,
}

impl ScriptedAdapter {
    fn new() -> Self {
        Self::sharing(VendorKind::Tuya, Arc::new(Gauge::default()))
    }

    /// `shared` 在多个适配器间统计合计并发。
    fn sharing(vendor: VendorKind, shared: Arc<Gauge>) -> Self {
        Self {
            vendor,
            status: Mutex::new(Ok(LockStatus {
                is_locked: Some(true),
                online: Some(true),
                battery_level: Some(90),
            })),
            command: Mutex::new(Ok(())),
            failing_devices: Mutex::new(HashMap::new()),
            delay: Mutex::new(Duration::ZERO),
            calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            gauge: Gauge::default(),
            shared,
        }
    }

    fn set_status(&self, status: Result<LockStatus, VendorError>) {
        *self.status.lock().unwrap() = status;
    }

    fn set_command(&self, result: Result<(), VendorError>) {
        *self.command.lock().unwrap() = result;
    }

    fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    fn fail_device(&self, vendor_device_id: &str, err: VendorError) {
        self.failing_devices
            .lock()
            .unwrap()
            .insert(vendor_device_id.to_string(), err);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn max_in_flight(&self) -> usize {
        self.gauge.max()
    }

    async fn enter(&self, device: &VendorDevice) -> Result<(), VendorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gauge.enter();
        self.shared.enter();
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.shared.leave();
        self.gauge.leave();
        match self.failing_devices.lock().unwrap().get(&device.vendor_device_id) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl VendorAdapter for ScriptedAdapter {
    fn vendor(&self) -> VendorKind {
        self.vendor
    }

    async fn status(
        &self,
        _creds: &VendorCredentials,
        device: &VendorDevice,
    ) -> Result<LockStatus, VendorError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.enter(device).await?;
        self.status.lock().unwrap().clone()
    }

    async fn lock(
        &self,
        _creds: &VendorCredentials,
        device: &VendorDevice,
    ) -> Result<(), VendorError> {
        self.enter(device).await?;
        self.command.lock().unwrap().clone()
    }

    async fn unlock(
        &self,
        _creds: &VendorCredentials,
        device: &VendorDevice,
    ) -> Result<(), VendorError> {
        self.enter(device).await?;
        self.command.lock().unwrap().clone()
    }

    async fn diagnostics(
        &self,
        _creds: &VendorCredentials,
        device: &VendorDevice,
    ) -> Result<Value, VendorError> {
        self.enter(device).await?;
        Ok(json!({ "device": device.vendor_device_id }))
    }

    async fn provision_key(
        &self,
        _creds: &VendorCredentials,
        device: &VendorDevice,
    ) -> Result<ProvisionedKey, VendorError> {
        self.enter(device).await?;
        Ok(ProvisionedKey {
            local_key: format!("key-{}", device.vendor_device_id),
        })
    }
}

/// 指定设备的遥测写入失败，其余委托给内存实现。
struct FailingTelemetryStore {
    inner: Arc<InMemoryLockDeviceStore>,
    fail_writes: AtomicBool,
}

#[async_trait]
impl LockDeviceStore for FailingTelemetryStore {
    async fn list_lock_devices(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        active_only: bool,
    ) -> Result<Vec<LockDeviceRecord>, StorageError> {
        self.inner.list_lock_devices(ctx, site_id, active_only).await
    }

    async fn find_lock_device(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<Option<LockDeviceRecord>, StorageError> {
        self.inner.find_lock_device(ctx, site_id, device_id).await
    }

    async fn create_lock_device(
        &self,
        ctx: &TenantContext,
        record: LockDeviceRecord,
    ) -> Result<LockDeviceRecord, StorageError> {
        self.inner.create_lock_device(ctx, record).await
    }

    async fn update_lock_device(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
        update: LockDeviceUpdate,
    ) -> Result<Option<LockDeviceRecord>, StorageError> {
        self.inner
            .update_lock_device(ctx, site_id, device_id, update)
            .await
    }

    async fn apply_telemetry(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
        update: LockTelemetryUpdate,
    ) -> Result<Option<LockDeviceRecord>, StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::new("db down"));
        }
        self.inner
            .apply_telemetry(ctx, site_id, device_id, update)
            .await
    }

    async fn record_key_provisioned(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
        key: KeyProvisioned,
    ) -> Result<Option<LockDeviceRecord>, StorageError> {
        self.inner
            .record_key_provisioned(ctx, site_id, device_id, key)
            .await
    }

    async fn purge_lock_device(
        &self,
        ctx: &TenantContext,
        site_id: &str,
        device_id: &str,
    ) -> Result<bool, StorageError> {
        self.inner.purge_lock_device(ctx, site_id, device_id).await
    }
}

struct Harness {
    orchestrator: LockOrchestrator,
    devices: Arc<InMemoryLockDeviceStore>,
    credentials: Arc<InMemoryCredentialStore>,
    logs: Arc<InMemoryAccessLogStore>,
    adapter: Arc<ScriptedAdapter>,
}

fn ctx() -> TenantContext {
    TenantContext::new("tenant-1", "user-1", vec![], vec![], None).with_display_name("Skipper")
}

fn config() -> OrchestratorConfig {
    OrchestratorConfig {
        adapter_timeout: Duration::from_millis(500),
        recheck_delay_ms: 0,
        ..OrchestratorConfig::default()
    }
}

fn credentials(credential_id: &str) -> CredentialSetRecord {
    vendor_credentials(credential_id, VendorKind::Tuya)
}

fn vendor_credentials(credential_id: &str, vendor: VendorKind) -> CredentialSetRecord {
    CredentialSetRecord {
        credential_id: credential_id.to_string(),
        tenant_id: "tenant-1".to_string(),
        site_id: "site-1".to_string(),
        vendor,
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        region: "eu".to_string(),
        base_url: None,
        is_active: true,
        updated_at_ms: 1,
    }
}

async fn harness(config: OrchestratorConfig) -> Harness {
    let devices = Arc::new(InMemoryLockDeviceStore::new());
    let credentials_store = Arc::new(InMemoryCredentialStore::new());
    let logs = Arc::new(InMemoryAccessLogStore::new());
    let adapter = Arc::new(ScriptedAdapter::new());
    credentials_store
        .upsert_credentials(&ctx(), credentials("cred-1"))
        .await
        .expect("credentials");
    let registry = AdapterRegistry::new().with_adapter(adapter.clone());
    let orchestrator = LockOrchestrator::new_with_config(
        devices.clone(),
        credentials_store.clone(),
        logs.clone(),
        registry,
        config,
    );
    Harness {
        orchestrator,
        devices,
        credentials: credentials_store,
        logs,
        adapter,
    }
}

async fn add_device(harness: &Harness, device_id: &str) -> LockDeviceRecord {
    add_vendor_device(harness, device_id, VendorKind::Tuya).await
}

async fn add_vendor_device(
    harness: &Harness,
    device_id: &str,
    vendor: VendorKind,
) -> LockDeviceRecord {
    let mut record = LockDeviceRecord::new(
        device_id,
        "tenant-1",
        "site-1",
        vendor,
        format!("v-{}", device_id),
        format!("Lock {}", device_id),
        "front door",
        1,
    );
    record.local_key = Some("existing".to_string());
    harness
        .devices
        .create_lock_device(&ctx(), record)
        .await
        .expect("create")
}

async fn set_state(harness: &Harness, device_id: &str, state: LockState) {
    harness
        .devices
        .apply_telemetry(
            &ctx(),
            "site-1",
            device_id,
            LockTelemetryUpdate {
                lock_state: Some(state),
                lock_state_confirmed: true,
                ts_ms: 10,
                ..LockTelemetryUpdate::default()
            },
        )
        .await
        .expect("apply");
}

async fn device(harness: &Harness, device_id: &str) -> LockDeviceRecord {
    harness
        .devices
        .find_lock_device(&ctx(), "site-1", device_id)
        .await
        .expect("find")
        .expect("device")
}

#[tokio::test]
async fn key_setup_pending_rejects_lock_without_adapter_call() {
    let harness = harness(config()).await;
    let mut record = LockDeviceRecord::new(
        "d1", "tenant-1", "site-1", VendorKind::Tuya, "v-d1", "Salon", "salon door", 1,
    );
    record.category = Some("jtmspro".to_string());
    record.requires_key_setup = true;
    harness
        .devices
        .create_lock_device(&ctx(), record)
        .await
        .expect("create");

    let result = harness
        .orchestrator
        .issue_command(&ctx(), "site-1", "d1", LockAction::Lock)
        .await
        .expect("result");
    assert!(!result.success);
    assert_eq!(result.error_kind, Some(CommandErrorKind::KeySetupRequired));
    assert_eq!(harness.adapter.calls(), 0);
    assert_eq!(harness.logs.len(), 1);
    assert_eq!(device(&harness, "d1").await.lock_state, LockState::Unknown);

    // status 与 diagnostics 不受限制
    let status = harness
        .orchestrator
        .refresh_status(&ctx(), "site-1", "d1")
        .await
        .expect("status");
    assert!(status.success);
    let diagnostics = harness
        .orchestrator
        .issue_command(&ctx(), "site-1", "d1", LockAction::Diagnostics)
        .await
        .expect("diagnostics");
    assert!(diagnostics.diagnostics.is_some());
    assert_eq!(harness.adapter.calls(), 2);
    assert_eq!(harness.logs.len(), 3);
}

#[tokio::test]
async fn provisioning_key_unblocks_lock() {
    let harness = harness(config()).await;
    let mut record = LockDeviceRecord::new(
        "d1", "tenant-1", "site-1", VendorKind::Tuya, "v-d1", "Salon", "salon door", 1,
    );
    record.category = Some("jtmsbh".to_string());
    harness
        .devices
        .create_lock_device(&ctx(), record)
        .await
        .expect("create");

    let blocked = harness
        .orchestrator
        .issue_command(&ctx(), "site-1", "d1", LockAction::Unlock)
        .await
        .expect("result");
    assert_eq!(blocked.error_kind, Some(CommandErrorKind::KeySetupRequired));

    let provisioned = harness
        .orchestrator
        .provision_key(&ctx(), "site-1", "d1")
        .await
        .expect("provision");
    assert!(provisioned.success);
    let stored = device(&harness, "d1").await;
    assert_eq!(stored.local_key.as_deref(), Some("key-v-d1"));
    assert!(stored.key_set_at_ms.is_some());
    assert!(!stored.requires_key_setup);

    let unlocked = harness
        .orchestrator
        .issue_command(&ctx(), "site-1", "d1", LockAction::Unlock)
        .await
        .expect("unlock");
    assert!(unlocked.success);
    let logs = harness
        .logs
        .list_access_logs(&ctx(), "site-1", AccessLogQuery::default())
        .await
        .expect("logs");
    let actions: Vec<AccessAction> = logs.iter().map(|item| item.action).collect();
    assert_eq!(
        actions,
        vec![AccessAction::Unlock, AccessAction::ProvisionKey, AccessAction::Unlock]
    );
    assert!(!logs[2].success);
}

#[tokio::test]
async fn unlock_is_optimistic_until_status_confirms() {
    let harness = harness(config()).await;
    add_device(&harness, "d2").await;
    set_state(&harness, "d2", LockState::Locked).await;

    let result = harness
        .orchestrator
        .issue_command(&ctx(), "site-1", "d2", LockAction::Unlock)
        .await
        .expect("unlock");
    assert!(result.success);
    assert_eq!(result.is_locked, Some(false));
    assert!(!result.confirmed);
    let stored = device(&harness, "d2").await;
    assert_eq!(stored.lock_state, LockState::Unlocked);
    assert!(!stored.is_state_confirmed());
    assert_eq!(harness.logs.len(), 1);

    harness.adapter.set_status(Ok(LockStatus {
        is_locked: Some(false),
        online: Some(true),
        battery_level: Some(55),
    }));
    let refreshed = harness
        .orchestrator
        .refresh_status(&ctx(), "site-1", "d2")
        .await
        .expect("refresh");
    assert!(refreshed.confirmed);
    let stored = device(&harness, "d2").await;
    assert_eq!(stored.lock_state, LockState::Unlocked);
    assert!(stored.is_state_confirmed());
    assert!(stored.last_status_check_ms.is_some());
    assert_eq!(stored.battery_level, Some(55));
    assert_eq!(harness.logs.len(), 2);

    let last = harness
        .orchestrator
        .last_activity(&ctx(), "site-1", "d2")
        .await
        .expect("activity")
        .expect("entry");
    assert_eq!(last.action, AccessAction::Status);
    assert_eq!(last.actor, "Skipper");
    assert!(last.success);
}

#[tokio::test]
async fn subscription_expiry_surfaces_alert_until_next_success() {
    let harness = harness(config()).await;
    add_device(&harness, "d1").await;
    add_device(&harness, "d2").await;
    set_state(&harness, "d1", LockState::Locked).await;
    let expired = VendorError::new(CommandErrorKind::SubscriptionExpired, "plan expired");
    harness.adapter.set_command(Err(expired.clone()));
    harness.adapter.set_status(Err(expired));

    let lock = harness
        .orchestrator
        .issue_command(&ctx(), "site-1", "d1", LockAction::Unlock)
        .await
        .expect("result");
    assert_eq!(lock.error_kind, Some(CommandErrorKind::SubscriptionExpired));
    let status = harness
        .orchestrator
        .refresh_status(&ctx(), "site-1", "d2")
        .await
        .expect("result");
    assert_eq!(status.error_kind, Some(CommandErrorKind::SubscriptionExpired));
    assert_eq!(device(&harness, "d1").await.lock_state, LockState::Locked);
    assert_eq!(device(&harness, "d2").await.lock_state, LockState::Unknown);

    let alerts = harness.orchestrator.subscription_alerts(&ctx(), "site-1");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].vendor, VendorKind::Tuya);
    assert_eq!(alerts[0].credential_id, "cred-1");

    harness.adapter.set_command(Ok(()));
    let recovered = harness
        .orchestrator
        .issue_command(&ctx(), "site-1", "d1", LockAction::Lock)
        .await
        .expect("result");
    assert!(recovered.success);
    assert!(harness.orchestrator.subscription_alerts(&ctx(), "site-1").is_empty());
    assert_eq!(harness.logs.len(), 3);
}

#[tokio::test]
async fn manual_correction_makes_no_adapter_call() {
    let harness = harness(config()).await;
    add_device(&harness, "d3").await;

    let result = harness
        .orchestrator
        .manual_correction(&ctx(), "site-1", "d3", LockState::Locked)
        .await
        .expect("correction");
    assert!(result.success);
    assert!(result.confirmed);
    assert_eq!(result.is_locked, Some(true));
    assert_eq!(harness.adapter.calls(), 0);
    let stored = device(&harness, "d3").await;
    assert_eq!(stored.lock_state, LockState::Locked);
    assert!(stored.is_state_confirmed());
    let last = harness
        .orchestrator
        .last_activity(&ctx(), "site-1", "d3")
        .await
        .expect("activity")
        .expect("entry");
    assert_eq!(last.action, AccessAction::ManualCorrection);
    assert_eq!(harness.logs.len(), 1);

    let err = harness
        .orchestrator
        .manual_correction(&ctx(), "site-1", "d3", LockState::Unknown)
        .await
        .expect_err("unknown rejected");
    assert!(matches!(err, ControlError::InvalidRequest(_)));
    assert_eq!(harness.logs.len(), 1);
}

#[tokio::test]
async fn failed_reads_and_commands_leave_state() {
    let harness = harness(config()).await;
    add_device(&harness, "d1").await;
    set_state(&harness, "d1", LockState::Locked).await;
    harness
        .adapter
        .set_status(Err(VendorError::new(CommandErrorKind::DeviceOffline, "offline")));
    harness
        .adapter
        .set_command(Err(VendorError::new(CommandErrorKind::DeviceOffline, "offline")));

    let status = harness
        .orchestrator
        .refresh_status(&ctx(), "site-1", "d1")
        .await
        .expect("status");
    assert_eq!(status.error_kind, Some(CommandErrorKind::DeviceOffline));
    let unlock = harness
        .orchestrator
        .issue_command(&ctx(), "site-1", "d1", LockAction::Unlock)
        .await
        .expect("unlock");
    assert!(!unlock.success);
    assert_eq!(unlock.error_detail.as_deref(), Some("offline"));

    let stored = device(&harness, "d1").await;
    assert_eq!(stored.lock_state, LockState::Locked);
    assert!(stored.is_state_confirmed());
    assert!(stored.last_status_check_ms.is_none());
    let logs = harness
        .logs
        .list_access_logs(&ctx(), "site-1", AccessLogQuery::default())
        .await
        .expect("logs");
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|item| !item.success));
    assert!(
        logs.iter()
            .all(|item| item.error_kind == Some(CommandErrorKind::DeviceOffline))
    );
}

#[tokio::test]
async fn status_without_lock_state_reads_as_unknown() {
    let harness = harness(config()).await;
    add_device(&harness, "d1").await;
    set_state(&harness, "d1", LockState::Locked).await;
    let before = device(&harness, "d1").await;
    assert!(before.is_state_confirmed());
    harness.adapter.set_status(Ok(LockStatus {
        is_locked: None,
        online: Some(true),
        battery_level: Some(12),
    }));

    let result = harness
        .orchestrator
        .refresh_status(&ctx(), "site-1", "d1")
        .await
        .expect("status");
    assert!(result.success);
    assert_eq!(result.is_locked, None);
    assert!(!result.confirmed);
    let stored = device(&harness, "d1").await;
    assert_eq!(stored.lock_state, LockState::Unknown);
    assert!(!stored.is_state_confirmed());
    assert!(stored.lock_state_updated_at_ms > before.lock_state_updated_at_ms);
    assert!(stored.online);
    assert_eq!(stored.battery_level, Some(12));
    assert!(stored.last_status_check_ms.is_some());

    // 下一次带状态的读取重新确认
    harness.adapter.set_status(Ok(LockStatus {
        is_locked: Some(true),
        online: Some(true),
        battery_level: Some(12),
    }));
    harness
        .orchestrator
        .refresh_status(&ctx(), "site-1", "d1")
        .await
        .expect("status");
    let stored = device(&harness, "d1").await;
    assert_eq!(stored.lock_state, LockState::Locked);
    assert!(stored.is_state_confirmed());
}

#[tokio::test]
async fn storage_failure_after_dispatch_is_still_logged() {
    let harness = harness(config()).await;
    add_device(&harness, "d1").await;
    set_state(&harness, "d1", LockState::Locked).await;
    let devices = Arc::new(FailingTelemetryStore {
        inner: harness.devices.clone(),
        fail_writes: AtomicBool::new(true),
    });
    let orchestrator = LockOrchestrator::new_with_config(
        devices,
        harness.credentials.clone(),
        harness.logs.clone(),
        AdapterRegistry::new().with_adapter(harness.adapter.clone()),
        config(),
    );

    let result = orchestrator
        .issue_command(&ctx(), "site-1", "d1", LockAction::Unlock)
        .await
        .expect("result");
    assert!(!result.success);
    assert_eq!(result.error_kind, Some(CommandErrorKind::Unknown));
    assert!(result.error_detail.unwrap_or_default().contains("db down"));
    assert_eq!(harness.adapter.calls(), 1);

    let correction = orchestrator
        .manual_correction(&ctx(), "site-1", "d1", LockState::Unlocked)
        .await
        .expect("correction");
    assert!(!correction.success);
    assert_eq!(correction.error_kind, Some(CommandErrorKind::Unknown));

    let logs = harness
        .logs
        .list_access_logs(&ctx(), "site-1", AccessLogQuery::default())
        .await
        .expect("logs");
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|item| !item.success));
    assert!(
        logs.iter()
            .all(|item| item.error_kind == Some(CommandErrorKind::Unknown))
    );
    assert_eq!(device(&harness, "d1").await.lock_state, LockState::Locked);
}

#[tokio::test]
async fn missing_or_inactive_device_is_logged_as_not_found() {
    let harness = harness(config()).await;
    let result = harness
        .orchestrator
        .issue_command(&ctx(), "site-1", "ghost", LockAction::Lock)
        .await
        .expect("result");
    assert_eq!(result.error_kind, Some(CommandErrorKind::DeviceNotFound));

    add_device(&harness, "d1").await;
    harness
        .devices
        .update_lock_device(&ctx(), "site-1", "d1", deactivate())
        .await
        .expect("update");
    let result = harness
        .orchestrator
        .refresh_status(&ctx(), "site-1", "d1")
        .await
        .expect("result");
    assert_eq!(result.error_kind, Some(CommandErrorKind::DeviceNotFound));
    assert_eq!(harness.adapter.calls(), 0);
    assert_eq!(harness.logs.len(), 2);
}

fn deactivate() -> LockDeviceUpdate {
    LockDeviceUpdate {
        is_active: Some(false),
        ..LockDeviceUpdate::default()
    }
}

#[tokio::test]
async fn credential_resolution_requires_exactly_one_active_set() {
    let harness = harness(config()).await;
    add_device(&harness, "d1").await;
    harness
        .credentials
        .insert_raw(credentials("cred-2"))
        .expect("raw insert");

    let result = harness
        .orchestrator
        .refresh_status(&ctx(), "site-1", "d1")
        .await
        .expect("result");
    assert_eq!(result.error_kind, Some(CommandErrorKind::AuthFailed));
    assert!(result.error_detail.unwrap_or_default().contains("multiple"));

    let mut inactive = credentials("cred-1");
    inactive.is_active = false;
    harness
        .credentials
        .upsert_credentials(&ctx(), inactive)
        .await
        .expect("deactivate");
    let mut inactive = credentials("cred-2");
    inactive.is_active = false;
    harness
        .credentials
        .upsert_credentials(&ctx(), inactive)
        .await
        .expect("deactivate");
    let result = harness
        .orchestrator
        .refresh_status(&ctx(), "site-1", "d1")
        .await
        .expect("result");
    assert_eq!(result.error_kind, Some(CommandErrorKind::AuthFailed));
    assert!(result.error_detail.unwrap_or_default().contains("no active"));
    assert_eq!(harness.adapter.calls(), 0);
    assert_eq!(harness.logs.len(), 2);
}

#[tokio::test]
async fn adapter_timeout_is_vendor_unavailable() {
    let harness = harness(OrchestratorConfig {
        adapter_timeout: Duration::from_millis(30),
        ..config()
    })
    .await;
    add_device(&harness, "d1").await;
    set_state(&harness, "d1", LockState::Unlocked).await;
    harness.adapter.set_delay(Duration::from_millis(300));

    let result = harness
        .orchestrator
        .issue_command(&ctx(), "site-1", "d1", LockAction::Lock)
        .await
        .expect("result");
    assert_eq!(result.error_kind, Some(CommandErrorKind::VendorUnavailable));
    assert_eq!(device(&harness, "d1").await.lock_state, LockState::Unlocked);
    assert_eq!(harness.logs.len(), 1);
}

#[tokio::test]
async fn same_device_commands_are_serialized() {
    let harness = harness(config()).await;
    add_device(&harness, "d1").await;
    harness.adapter.set_delay(Duration::from_millis(40));

    let ctx = ctx();
    let first = harness.orchestrator.clone();
    let second = harness.orchestrator.clone();
    let (lock, unlock) = tokio::join!(
        first.issue_command(&ctx, "site-1", "d1", LockAction::Lock),
        second.issue_command(&ctx, "site-1", "d1", LockAction::Unlock),
    );
    assert!(lock.expect("lock").success);
    assert!(unlock.expect("unlock").success);
    assert_eq!(harness.adapter.max_in_flight(), 1);
    assert_eq!(harness.logs.len(), 2);
}

#[tokio::test]
async fn different_devices_run_in_parallel() {
    let harness = harness(config()).await;
    add_device(&harness, "d1").await;
    add_device(&harness, "d2").await;
    harness.adapter.set_delay(Duration::from_millis(60));

    let ctx = ctx();
    let (a, b) = tokio::join!(
        harness.orchestrator.issue_command(&ctx, "site-1", "d1", LockAction::Lock),
        harness.orchestrator.issue_command(&ctx, "site-1", "d2", LockAction::Lock),
    );
    assert!(a.expect("a").success && b.expect("b").success);
    assert_eq!(harness.adapter.max_in_flight(), 2);
}

#[tokio::test]
async fn sweep_with_one_failure_updates_the_rest() {
    let harness = harness(config()).await;
    for id in ["d1", "d2", "d3", "d4"] {
        add_device(&harness, id).await;
    }
    harness
        .adapter
        .fail_device("v-d3", VendorError::new(CommandErrorKind::DeviceOffline, "offline"));

    let report = harness
        .orchestrator
        .refresh_all(&ctx(), "site-1")
        .await
        .expect("sweep");
    assert_eq!(report.total, 4);
    assert_eq!(report.refreshed, 3);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].device_id, "d3");
    assert_eq!(report.failed[0].error_kind, Some(CommandErrorKind::DeviceOffline));

    for id in ["d1", "d2", "d4"] {
        let stored = device(&harness, id).await;
        assert_eq!(stored.lock_state, LockState::Locked);
        assert!(stored.is_state_confirmed());
    }
    assert_eq!(device(&harness, "d3").await.lock_state, LockState::Unknown);
    assert_eq!(harness.logs.len(), 4);
}

#[tokio::test]
async fn sweep_respects_pool_bound() {
    let harness = harness(OrchestratorConfig {
        sweep_concurrency: 2,
        credential_concurrency: 8,
        ..config()
    })
    .await;
    for index in 0..6 {
        add_device(&harness, &format!("d{}", index)).await;
    }
    harness.adapter.set_delay(Duration::from_millis(30));

    let report = harness
        .orchestrator
        .refresh_all(&ctx(), "site-1")
        .await
        .expect("sweep");
    assert_eq!(report.refreshed, 6);
    assert!(harness.adapter.max_in_flight() <= 2);
}

#[tokio::test]
async fn sweep_respects_credential_ceiling() {
    let harness = harness(OrchestratorConfig {
        sweep_concurrency: 8,
        credential_concurrency: 2,
        ..config()
    })
    .await;
    for index in 0..6 {
        add_device(&harness, &format!("d{}", index)).await;
    }
    harness.adapter.set_delay(Duration::from_millis(40));

    let report = harness
        .orchestrator
        .refresh_all(&ctx(), "site-1")
        .await
        .expect("sweep");
    assert_eq!(report.refreshed, 6);
    assert_eq!(harness.adapter.max_in_flight(), 2);
}

#[tokio::test]
async fn credential_sets_do_not_throttle_each_other() {
    let shared = Arc::new(Gauge::default());
    let tuya = Arc::new(ScriptedAdapter::sharing(VendorKind::Tuya, shared.clone()));
    let ttlock = Arc::new(ScriptedAdapter::sharing(VendorKind::Ttlock, shared.clone()));
    let devices = Arc::new(InMemoryLockDeviceStore::new());
    let credentials_store = Arc::new(InMemoryCredentialStore::new());
    let logs = Arc::new(InMemoryAccessLogStore::new());
    for record in [
        vendor_credentials("cred-tuya", VendorKind::Tuya),
        vendor_credentials("cred-tt", VendorKind::Ttlock),
    ] {
        credentials_store
            .upsert_credentials(&ctx(), record)
            .await
            .expect("credentials");
    }
    let registry = AdapterRegistry::new()
        .with_adapter(tuya.clone())
        .with_adapter(ttlock.clone());
    let orchestrator = LockOrchestrator::new_with_config(
        devices.clone(),
        credentials_store.clone(),
        logs.clone(),
        registry,
        OrchestratorConfig {
            sweep_concurrency: 8,
            credential_concurrency: 1,
            ..config()
        },
    );
    let harness = Harness {
        orchestrator,
        devices,
        credentials: credentials_store,
        logs,
        adapter: tuya.clone(),
    };
    for index in 0..3 {
        add_vendor_device(&harness, &format!("tuya-{}", index), VendorKind::Tuya).await;
        add_vendor_device(&harness, &format!("tt-{}", index), VendorKind::Ttlock).await;
    }
    tuya.set_delay(Duration::from_millis(60));
    ttlock.set_delay(Duration::from_millis(60));

    let report = harness
        .orchestrator
        .refresh_all(&ctx(), "site-1")
        .await
        .expect("sweep");
    assert_eq!(report.refreshed, 6);
    assert_eq!(tuya.max_in_flight(), 1);
    assert_eq!(ttlock.max_in_flight(), 1);
    assert_eq!(shared.max(), 2);
    assert_eq!(harness.logs.len(), 6);
}

#[tokio::test]
async fn delayed_recheck_confirms_optimistic_state() {
    let harness = harness(OrchestratorConfig {
        recheck_delay_ms: 20,
        ..config()
    })
    .await;
    add_device(&harness, "d1").await;
    set_state(&harness, "d1", LockState::Unlocked).await;

    let result = harness
        .orchestrator
        .issue_command(&ctx(), "site-1", "d1", LockAction::Lock)
        .await
        .expect("lock");
    assert!(!result.confirmed);
    tokio::time::sleep(Duration::from_millis(200)).await;

    let stored = device(&harness, "d1").await;
    assert_eq!(stored.lock_state, LockState::Locked);
    assert!(stored.is_state_confirmed());
    assert_eq!(harness.adapter.status_calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.logs.len(), 1);
}
