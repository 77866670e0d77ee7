//! 追踪、请求 ID 与门锁指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub commands_issued: u64,
    pub command_success: u64,
    pub command_failure: u64,
    pub key_setup_rejections: u64,
    pub status_refresh_success: u64,
    pub status_refresh_failure: u64,
    pub manual_corrections: u64,
    pub subscription_expired: u64,
    pub adapter_latency_ms_total: u64,
    pub adapter_latency_ms_count: u64,
    pub sweeps_run: u64,
    pub rechecks_run: u64,
}

/// 进程内计数器。
pub struct TelemetryMetrics {
    commands_issued: AtomicU64,
    command_success: AtomicU64,
    command_failure: AtomicU64,
    key_setup_rejections: AtomicU64,
    status_refresh_success: AtomicU64,
    status_refresh_failure: AtomicU64,
    manual_corrections: AtomicU64,
    subscription_expired: AtomicU64,
    adapter_latency_ms_total: AtomicU64,
    adapter_latency_ms_count: AtomicU64,
    sweeps_run: AtomicU64,
    rechecks_run: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            commands_issued: AtomicU64::new(0),
            command_success: AtomicU64::new(0),
            command_failure: AtomicU64::new(0),
            key_setup_rejections: AtomicU64::new(0),
            status_refresh_success: AtomicU64::new(0),
            status_refresh_failure: AtomicU64::new(0),
            manual_corrections: AtomicU64::new(0),
            subscription_expired: AtomicU64::new(0),
            adapter_latency_ms_total: AtomicU64::new(0),
            adapter_latency_ms_count: AtomicU64::new(0),
            sweeps_run: AtomicU64::new(0),
            rechecks_run: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            commands_issued: self.commands_issued.load(Ordering::Relaxed),
            command_success: self.command_success.load(Ordering::Relaxed),
            command_failure: self.command_failure.load(Ordering::Relaxed),
            key_setup_rejections: self.key_setup_rejections.load(Ordering::Relaxed),
            status_refresh_success: self.status_refresh_success.load(Ordering::Relaxed),
            status_refresh_failure: self.status_refresh_failure.load(Ordering::Relaxed),
            manual_corrections: self.manual_corrections.load(Ordering::Relaxed),
            subscription_expired: self.subscription_expired.load(Ordering::Relaxed),
            adapter_latency_ms_total: self.adapter_latency_ms_total.load(Ordering::Relaxed),
            adapter_latency_ms_count: self.adapter_latency_ms_count.load(Ordering::Relaxed),
            sweeps_run: self.sweeps_run.load(Ordering::Relaxed),
            rechecks_run: self.rechecks_run.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录命令请求次数（含前置条件拒绝）。
pub fn record_command_issued() {
    metrics().commands_issued.fetch_add(1, Ordering::Relaxed);
}

pub fn record_command_success() {
    metrics().command_success.fetch_add(1, Ordering::Relaxed);
}

pub fn record_command_failure() {
    metrics().command_failure.fetch_add(1, Ordering::Relaxed);
}

/// 记录因未完成密钥配置被拒绝的开关锁。
pub fn record_key_setup_rejection() {
    metrics()
        .key_setup_rejections
        .fetch_add(1, Ordering::Relaxed);
}

pub fn record_status_refresh(success: bool) {
    let metrics = metrics();
    if success {
        metrics
            .status_refresh_success
            .fetch_add(1, Ordering::Relaxed);
    } else {
        metrics
            .status_refresh_failure
            .fetch_add(1, Ordering::Relaxed);
    }
}

pub fn record_manual_correction() {
    metrics().manual_corrections.fetch_add(1, Ordering::Relaxed);
}

/// 记录厂商订阅过期命中次数。
pub fn record_subscription_expired() {
    metrics()
        .subscription_expired
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录单次厂商调用耗时（毫秒，含超时）。
pub fn record_adapter_latency_ms(latency_ms: u64) {
    let metrics = metrics();
    metrics
        .adapter_latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
    metrics
        .adapter_latency_ms_count
        .fetch_add(1, Ordering::Relaxed);
}

pub fn record_sweep_run() {
    metrics().sweeps_run.fetch_add(1, Ordering::Relaxed);
}

/// 记录延迟复查执行次数。
pub fn record_recheck_run() {
    metrics().rechecks_run.fetch_add(1, Ordering::Relaxed);
}
