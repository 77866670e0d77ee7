use api_contract::ApiResponse;

#[test]
fn api_response_success() {
    let response = ApiResponse::success("ok");
    assert!(response.success);
    assert!(response.data.is_some());
    assert!(response.error.is_none());
}

#[test]
fn api_response_error() {
    let response = ApiResponse::<()>::error("AUTH.UNAUTHORIZED", "unauthorized");
    assert!(!response.success);
    assert!(response.data.is_none());
    assert!(response.error.is_some());
}

#[test]
fn api_response_failed_keeps_data() {
    let response = ApiResponse::failed("result", "DEVICE_OFFLINE", "offline");
    assert!(!response.success);
    assert_eq!(response.data, Some("result"));
    assert_eq!(response.error.map(|err| err.code).as_deref(), Some("DEVICE_OFFLINE"));
}
