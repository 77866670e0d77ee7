//! Harbor API 服务入口。

use harbor_api::{AppState, build_app};
use harbor_auth::JwtManager;
use harbor_config::AppConfig;
use harbor_control::{LockOrchestrator, OrchestratorConfig};
use harbor_storage::{
    AccessLogStore, CredentialStore, InMemoryAccessLogStore, InMemoryCredentialStore,
    InMemoryLockDeviceStore, InMemorySiteStore, LockDeviceStore, PgAccessLogStore,
    PgCredentialStore, PgLockDeviceStore, PgSiteStore, SiteStore, connect_pool,
};
use harbor_telemetry::init_tracing;
use harbor_vendor::{AdapterRegistry, AdapterSettings};
use std::sync::Arc;
use tracing::{info, warn};

// access token 由上游认证服务签发，本服务只校验；TTL 仅用于本地签发联调 token。
const LOCAL_TOKEN_TTL_SECONDS: u64 = 3600;

type Stores = (
    Arc<dyn SiteStore>,
    Arc<dyn LockDeviceStore>,
    Arc<dyn CredentialStore>,
    Arc<dyn AccessLogStore>,
);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing();

    let (site_store, lock_store, credential_store, access_log_store) = build_stores(&config).await?;

    let adapters = AdapterRegistry::with_builtin(&AdapterSettings {
        request_timeout: config.vendor_timeout(),
        tuya_base_url: config.tuya_base_url.clone(),
        ttlock_base_url: config.ttlock_base_url.clone(),
        tuya_key_setup_categories: config.tuya_key_setup_categories.clone(),
    })?;
    let orchestrator = LockOrchestrator::new_with_config(
        lock_store.clone(),
        credential_store.clone(),
        access_log_store.clone(),
        adapters,
        OrchestratorConfig {
            adapter_timeout: config.vendor_timeout(),
            recheck_delay_ms: config.recheck_delay_ms,
            sweep_concurrency: config.sweep_concurrency,
            credential_concurrency: config.credential_concurrency,
            key_setup_categories: config.tuya_key_setup_categories.clone(),
        },
    );

    let state = AppState {
        auth: JwtManager::new(config.jwt_secret.clone(), LOCAL_TOKEN_TTL_SECONDS),
        site_store,
        lock_store,
        credential_store,
        access_log_store,
        orchestrator,
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(target: "harbor.api", addr = %config.http_addr, "harbor_api_listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_stores(config: &AppConfig) -> Result<Stores, Box<dyn std::error::Error>> {
    let Some(url) = config.database_url.as_deref() else {
        warn!(target: "harbor.api", "database_url_missing_using_in_memory_stores");
        let site_store: Arc<dyn SiteStore> = Arc::new(InMemorySiteStore::with_default_site());
        let lock_store: Arc<dyn LockDeviceStore> = Arc::new(InMemoryLockDeviceStore::new());
        let credential_store: Arc<dyn CredentialStore> = Arc::new(InMemoryCredentialStore::new());
        let access_log_store: Arc<dyn AccessLogStore> = Arc::new(InMemoryAccessLogStore::new());
        return Ok((site_store, lock_store, credential_store, access_log_store));
    };
    let pool = connect_pool(url).await?;
    let site_store: Arc<dyn SiteStore> = Arc::new(PgSiteStore::new(pool.clone()));
    let lock_store: Arc<dyn LockDeviceStore> = Arc::new(PgLockDeviceStore::new(pool.clone()));
    let credential_store: Arc<dyn CredentialStore> = Arc::new(PgCredentialStore::new(pool.clone()));
    let access_log_store: Arc<dyn AccessLogStore> = Arc::new(PgAccessLogStore::new(pool));
    Ok((site_store, lock_store, credential_store, access_log_store))
}
