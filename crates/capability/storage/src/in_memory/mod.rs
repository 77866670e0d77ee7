//! 内存存储实现模块
//!
//! 仅用于本地演示和测试（未配置数据库时 API 也使用它）。
//!
//! 包含以下实现：
//! - SiteStore: InMemorySiteStore
//! - LockDeviceStore: InMemoryLockDeviceStore
//! - CredentialStore: InMemoryCredentialStore
//! - AccessLogStore: InMemoryAccessLogStore

pub mod access_log;
pub mod credential;
pub mod lock_device;
pub mod site;

pub use access_log::*;
pub use credential::*;
pub use lock_device::*;
pub use site::*;
