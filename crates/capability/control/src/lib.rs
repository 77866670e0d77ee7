//! # Harbor Control 模块
//!
//! 门锁编排：命令下发、状态对账、人工纠正、密钥配置与站点批量刷新。
//!
//! - `orchestrator.rs`：`LockOrchestrator` 与命令结果
//! - `lease.rs`：设备租约（同设备串行）
//! - `limiter.rs`：按凭证的并发上限
//! - `alerts.rs`：订阅过期全局告警
//!
//! 厂商失败不作为 `Err` 返回，而是放入 [`CommandResult`]；
//! `ControlError` 只表示存储等基础设施失败。

pub mod alerts;
pub mod error;
pub mod lease;
pub mod limiter;
pub mod orchestrator;

pub use alerts::{SubscriptionAlert, SubscriptionAlerts};
pub use error::ControlError;
pub use orchestrator::{
    CommandResult, LockOrchestrator, OrchestratorConfig, SweepFailure, SweepReport,
};
