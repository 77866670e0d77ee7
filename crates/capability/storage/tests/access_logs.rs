use domain::{AccessAction, CommandErrorKind, TenantContext};
use harbor_storage::{AccessLogQuery, AccessLogRecord, AccessLogStore, InMemoryAccessLogStore};

fn ctx() -> TenantContext {
    TenantContext::new("tenant-1", "user-1", vec![], vec![], None)
}

fn entry(log_id: &str, device_id: &str, success: bool, ts_ms: i64) -> AccessLogRecord {
    AccessLogRecord {
        log_id: log_id.to_string(),
        tenant_id: "tenant-1".to_string(),
        site_id: "site-1".to_string(),
        device_id: device_id.to_string(),
        actor: "Skipper".to_string(),
        action: AccessAction::Lock,
        location: "aft hatch".to_string(),
        success,
        error_kind: (!success).then_some(CommandErrorKind::DeviceOffline),
        error_message: (!success).then(|| "device offline".to_string()),
        ts_ms,
    }
}

#[tokio::test]
async fn logs_are_listed_newest_first_with_filters() {
    let store = InMemoryAccessLogStore::new();
    store.append_access_log(&ctx(), entry("l-1", "d-1", true, 100)).await.expect("append");
    store.append_access_log(&ctx(), entry("l-2", "d-2", false, 200)).await.expect("append");
    store.append_access_log(&ctx(), entry("l-3", "d-1", false, 300)).await.expect("append");

    let all = store
        .list_access_logs(&ctx(), "site-1", AccessLogQuery::default())
        .await
        .expect("list");
    let ids: Vec<&str> = all.iter().map(|item| item.log_id.as_str()).collect();
    assert_eq!(ids, vec!["l-3", "l-2", "l-1"]);

    let device = store
        .list_access_logs(
            &ctx(),
            "site-1",
            AccessLogQuery {
                device_id: Some("d-1".to_string()),
                from_ms: Some(150),
                ..AccessLogQuery::default()
            },
        )
        .await
        .expect("list");
    assert_eq!(device.len(), 1);
    assert_eq!(device[0].error_kind, Some(CommandErrorKind::DeviceOffline));

    let last = store
        .last_access_log(&ctx(), "site-1", "d-1")
        .await
        .expect("last")
        .expect("entry");
    assert_eq!(last.log_id, "l-3");
    assert_eq!(store.count_access_logs(&ctx(), "site-1", "d-2").await.expect("count"), 1);
}

#[tokio::test]
async fn append_rejects_foreign_tenant() {
    let store = InMemoryAccessLogStore::new();
    let other = TenantContext::new("tenant-2", "user-2", vec![], vec![], None);
    let err = store
        .append_access_log(&other, entry("l-1", "d-1", true, 100))
        .await
        .expect_err("tenant mismatch");
    assert_eq!(err.to_string(), "tenant mismatch");
    assert!(store.is_empty());
}
