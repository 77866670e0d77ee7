//! 应用运行配置加载。

use std::env;
use std::time::Duration;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    /// 未配置时使用内存存储（仅演示）。
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub vendor_timeout_seconds: u64,
    pub recheck_delay_ms: u64,
    pub sweep_concurrency: usize,
    pub credential_concurrency: usize,
    pub tuya_base_url: Option<String>,
    pub ttlock_base_url: Option<String>,
    pub tuya_key_setup_categories: Vec<String>,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = read_optional("HARBOR_JWT_SECRET")
            .ok_or_else(|| ConfigError::Missing("HARBOR_JWT_SECRET".to_string()))?;
        let http_addr =
            env::var("HARBOR_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let database_url = read_optional("HARBOR_DATABASE_URL");
        let vendor_timeout_seconds = read_u64_with_default("HARBOR_VENDOR_TIMEOUT_SECONDS", 12)?;
        if vendor_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "HARBOR_VENDOR_TIMEOUT_SECONDS".to_string(),
                "0".to_string(),
            ));
        }
        let recheck_delay_ms = read_u64_with_default("HARBOR_RECHECK_DELAY_MS", 4_000)?;
        let sweep_concurrency =
            read_u64_with_default("HARBOR_SWEEP_CONCURRENCY", 6)?.clamp(1, 8) as usize;
        let credential_concurrency =
            read_u64_with_default("HARBOR_CREDENTIAL_CONCURRENCY", 2)?.max(1) as usize;
        let tuya_base_url = read_optional("HARBOR_TUYA_BASE_URL");
        let ttlock_base_url = read_optional("HARBOR_TTLOCK_BASE_URL");
        let tuya_key_setup_categories = read_list_with_default(
            "HARBOR_TUYA_KEY_SETUP_CATEGORIES",
            &["jtmspro", "jtmsbh"],
        );

        Ok(Self {
            http_addr,
            database_url,
            jwt_secret,
            vendor_timeout_seconds,
            recheck_delay_ms,
            sweep_concurrency,
            credential_concurrency,
            tuya_base_url,
            ttlock_base_url,
            tuya_key_setup_categories,
        })
    }

    pub fn vendor_timeout(&self) -> Duration {
        Duration::from_secs(self.vendor_timeout_seconds)
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => return Ok(default),
    };
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

/// 逗号分隔列表；未设置时使用默认值，设置为空串表示空列表。
fn read_list_with_default(key: &str, default: &[&str]) -> Vec<String> {
    match env::var(key) {
        Ok(value) => value
            .split(',')
            .map(|item| item.trim().to_ascii_lowercase())
            .filter(|item| !item.is_empty())
            .collect(),
        Err(_) => default.iter().map(|item| item.to_string()).collect(),
    }
}
