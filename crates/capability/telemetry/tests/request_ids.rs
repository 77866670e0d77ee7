use harbor_telemetry::{metrics, new_request_ids, record_adapter_latency_ms, record_status_refresh};

#[test]
fn request_ids_non_empty() {
    let ids = new_request_ids();
    assert!(!ids.request_id.is_empty());
    assert!(!ids.trace_id.is_empty());
    assert_ne!(ids.request_id, ids.trace_id);
}

#[test]
fn counters_accumulate() {
    let before = metrics().snapshot();
    record_status_refresh(true);
    record_status_refresh(false);
    record_adapter_latency_ms(40);
    let after = metrics().snapshot();
    assert!(after.status_refresh_success > before.status_refresh_success);
    assert!(after.status_refresh_failure > before.status_refresh_failure);
    assert!(after.adapter_latency_ms_total >= before.adapter_latency_ms_total + 40);
    assert!(after.adapter_latency_ms_count > before.adapter_latency_ms_count);
}
