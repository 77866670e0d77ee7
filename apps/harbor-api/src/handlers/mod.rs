//! Handlers 模块

pub mod access_logs;
pub mod alerts;
pub mod commands;
pub mod credentials;
pub mod health;
pub mod locks;

pub use access_logs::*;
pub use alerts::*;
pub use commands::*;
pub use credentials::*;
pub use health::*;
pub use locks::*;

#[derive(serde::Deserialize)]
pub struct SitePath {
    pub site_id: String,
}

#[derive(serde::Deserialize)]
pub struct LockPath {
    pub site_id: String,
    pub device_id: String,
}
