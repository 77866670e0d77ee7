use domain::{LockAction, TenantContext, VendorKind};

#[test]
fn tenant_context_builds() {
    let ctx = TenantContext::new(
        "tenant-1",
        "user-1",
        vec!["admin".to_string()],
        vec!["LOCK.DEVICE.READ".to_string()],
        None,
    );

    assert_eq!(ctx.tenant_id, "tenant-1");
    assert_eq!(ctx.user_id, "user-1");
    assert_eq!(ctx.roles.len(), 1);
    assert!(ctx.has_permission("LOCK.DEVICE.READ"));
    assert!(ctx.site_scope.is_none());
}

#[test]
fn actor_name_prefers_display_name() {
    let ctx = TenantContext::new("tenant-1", "user-1", vec![], vec![], None);
    assert_eq!(ctx.actor_name(), "user-1");

    let ctx = ctx.with_display_name("Dock Master");
    assert_eq!(ctx.actor_name(), "Dock Master");

    let blank =
        TenantContext::new("tenant-1", "user-2", vec![], vec![], None).with_display_name("  ");
    assert_eq!(blank.actor_name(), "user-2");
}

#[test]
fn vendor_and_action_codes_parse() {
    assert_eq!(VendorKind::parse("TTLock"), Some(VendorKind::Ttlock));
    assert_eq!(VendorKind::parse("tuya"), Some(VendorKind::Tuya));
    assert!(VendorKind::parse("august").is_none());
    assert_eq!(LockAction::parse("provision-key"), Some(LockAction::ProvisionKey));
}
