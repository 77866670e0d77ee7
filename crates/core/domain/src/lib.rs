pub mod lock;
pub mod permissions;

pub use lock::{AccessAction, CommandErrorKind, LockAction, LockState, VendorKind};

/// 租户上下文：所有模块共享的执行上下文。
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: String,
    pub user_id: String,
    /// 操作人显示名（写入门禁日志，缺省时回退到 user_id）。
    pub display_name: Option<String>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub site_scope: Option<String>,
}

impl TenantContext {
    /// 构造显式身份与权限范围的租户上下文。
    pub fn new(
        tenant_id: impl Into<String>,
        user_id: impl Into<String>,
        roles: Vec<String>,
        permissions: Vec<String>,
        site_scope: Option<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user_id: user_id.into(),
            display_name: None,
            roles,
            permissions,
            site_scope,
        }
    }

    /// 附加操作人显示名。
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        if !display_name.trim().is_empty() {
            self.display_name = Some(display_name);
        }
        self
    }

    /// 写入日志的操作人名称。
    pub fn actor_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.user_id)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|item| item == permission)
    }
}

impl Default for TenantContext {
    /// 空上下文（仅用于测试或占位）。
    fn default() -> Self {
        Self {
            tenant_id: "".to_string(),
            user_id: "".to_string(),
            display_name: None,
            roles: Vec::new(),
            permissions: Vec::new(),
            site_scope: None,
        }
    }
}
