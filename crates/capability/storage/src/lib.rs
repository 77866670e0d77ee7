//! # Harbor Storage 模块
//!
//! 门锁子系统的统一存储抽象层，支持内存与 PostgreSQL 两种后端。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：站点、门锁、厂商凭证、门禁日志的异步 Trait 接口
//! 2. **数据模型层** (`models.rs`)：记录与更新结构
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **验证辅助层** (`validation.rs`)：多租户和站点作用域验证
//! 5. **连接管理层** (`connection.rs`)：数据库连接池管理
//! 6. **跨存储规则** (`registry.rs`)：有日志历史的设备只停用不删除
//! 7. **实现层**：
//!    - `in_memory/`：内存存储实现（测试和未配置数据库时的演示）
//!    - `postgres/`：PostgreSQL 存储实现（生产环境使用）
//!
//! ## 核心约束
//!
//! - **多租户隔离**：所有存储接口都显式接收 `TenantContext`
//! - **站点作用域**：`TenantContext.site_scope` 存在时必须与请求的 `site_id` 一致
//! - **只追加日志**：门禁日志没有修改与删除接口
//! - **凭证唯一**：每站点每厂商至多一套生效凭证
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use harbor_storage::{InMemoryLockDeviceStore, LockDeviceStore};
//! use domain::TenantContext;
//!
//! let store = InMemoryLockDeviceStore::new();
//! let ctx = TenantContext::new("tenant-1", "user-1", vec![], vec![], None);
//! let devices = store.list_lock_devices(&ctx, "site-1", true).await?;
//! ```

pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod registry;
pub mod traits;
pub mod validation;

pub use connection::*;
pub use error::*;
pub use models::*;
pub use registry::*;
pub use traits::*;
pub use validation::*;

pub use in_memory::{
    InMemoryAccessLogStore, InMemoryCredentialStore, InMemoryLockDeviceStore, InMemorySiteStore,
};

pub use postgres::{PgAccessLogStore, PgCredentialStore, PgLockDeviceStore, PgSiteStore};

/// 当前时间戳（毫秒）。
pub fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    let duration = now
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    duration.as_millis() as i64
}
