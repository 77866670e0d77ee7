//! # PostgreSQL 存储实现模块
//!
//! 本模块提供所有存储接口的 PostgreSQL 实现，用于生产环境。
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有 SQL 查询使用参数绑定，防止 SQL 注入攻击
//! 2. **多租户隔离**：所有查询都包含 `tenant_id` 过滤条件
//! 3. **站点作用域**：站点级资源操作包含 `site_id` 过滤条件
//! 4. **枚举编码**：锁状态、厂商、日志动作、错误分类以稳定字符串落库
//!
//! ## 包含的实现
//!
//! - **SiteStore** (`site.rs`)
//! - **LockDeviceStore** (`lock_device.rs`)
//! - **CredentialStore** (`credential.rs`)：生效凭证唯一性在事务内维护
//! - **AccessLogStore** (`access_log.rs`)：只追加
//!
//! ## 数据库模式要求
//!
//! 见仓库根目录 `migrations/0001_lock_tables.sql`：
//! - `sites`：站点表（site_id, tenant_id, name, timezone）
//! - `lock_devices`：门锁表（含遥测与生命周期字段）
//! - `lock_credentials`：厂商凭证表（部分唯一索引约束生效凭证）
//! - `lock_access_logs`：门禁日志表（`seq` 自增列用于同毫秒排序）
//!
//! ## 错误处理
//!
//! 所有存储操作返回 `Result<T, StorageError>`；
//! 返回 `Option<T>` 表示"可能不存在"（查询、更新）。

pub mod access_log;
pub mod credential;
pub mod lock_device;
pub mod site;

pub use access_log::*;
pub use credential::*;
pub use lock_device::*;
pub use site::*;
