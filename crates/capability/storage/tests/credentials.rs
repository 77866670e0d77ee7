use domain::{TenantContext, VendorKind};
use harbor_storage::{CredentialSetRecord, CredentialStore, InMemoryCredentialStore};

fn ctx() -> TenantContext {
    TenantContext::new("tenant-1", "admin", vec![], vec![], None)
}

fn credentials(credential_id: &str, vendor: VendorKind, at_ms: i64) -> CredentialSetRecord {
    CredentialSetRecord {
        credential_id: credential_id.to_string(),
        tenant_id: "tenant-1".to_string(),
        site_id: "site-1".to_string(),
        vendor,
        client_id: format!("client-{}", credential_id),
        client_secret: "secret".to_string(),
        region: "us".to_string(),
        base_url: None,
        is_active: true,
        updated_at_ms: at_ms,
    }
}

#[tokio::test]
async fn activating_credentials_deactivates_previous_set() {
    let store = InMemoryCredentialStore::new();
    store
        .upsert_credentials(&ctx(), credentials("c-1", VendorKind::Tuya, 1))
        .await
        .expect("first");
    store
        .upsert_credentials(&ctx(), credentials("c-2", VendorKind::Tuya, 2))
        .await
        .expect("second");
    store
        .upsert_credentials(&ctx(), credentials("c-3", VendorKind::Ttlock, 3))
        .await
        .expect("other vendor");

    let tuya = store
        .list_credentials(&ctx(), "site-1", Some(VendorKind::Tuya))
        .await
        .expect("list");
    let active: Vec<_> = tuya.iter().filter(|item| item.is_active).collect();
    assert_eq!(tuya.len(), 2);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].credential_id, "c-2");

    let ttlock = store
        .list_credentials(&ctx(), "site-1", Some(VendorKind::Ttlock))
        .await
        .expect("list");
    assert!(ttlock[0].is_active);
}
