//! 认证和授权中间件
//!
//! 提供以下中间件和辅助函数：
//! - request_context：请求上下文中间件，注入 request_id/trace_id
//! - bearer_token：从 Authorization 头提取 Bearer token
//! - require_tenant_context：验证 token 并提取租户上下文
//! - require_site_scope：验证站点归属（带租户上下文）
//! - require_permission：校验权限码
//!
//! 认证流程：
//! 1. request_context：在所有请求前注入追踪 ID
//! 2. bearer_token：从请求头提取 token
//! 3. require_tenant_context：验证 JWT 签名，获取 TenantContext
//! 4. require_site_scope：token 限定站点时必须一致，且站点属于当前租户

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::Response,
};
use harbor_auth::AuthError;
use harbor_telemetry::new_request_ids;
use tracing::{Instrument, info_span};

use crate::AppState;
use crate::utils::response::{auth_error, forbidden_error, internal_auth_error, storage_error};
use domain::TenantContext;

/// 请求上下文中间件：注入 request_id/trace_id
pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}

/// 从请求头中提取 Bearer token
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header_value = headers.get(header::AUTHORIZATION)?;
    let auth_str = header_value.to_str().ok()?;
    auth_str.strip_prefix("Bearer ")
}

/// 验证并提取租户上下文
pub fn require_tenant_context(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<TenantContext, Response> {
    let token = match bearer_token(headers) {
        Some(token) => token,
        None => return Err(auth_error(StatusCode::UNAUTHORIZED)),
    };
    match state.auth.decode_access(token) {
        Ok(ctx) => Ok(ctx),
        Err(AuthError::TokenInvalid | AuthError::TokenExpired) => {
            Err(auth_error(StatusCode::UNAUTHORIZED))
        }
        Err(err) => Err(internal_auth_error(err)),
    }
}

/// 验证站点归属权限
pub async fn require_site_scope(
    state: &AppState,
    headers: &HeaderMap,
    site_id: &str,
) -> Result<TenantContext, Response> {
    let mut ctx = require_tenant_context(state, headers)?;
    if ctx
        .site_scope
        .as_deref()
        .is_some_and(|scope| scope != site_id)
    {
        return Err(forbidden_error());
    }
    match state.site_store.site_belongs_to_tenant(&ctx, site_id).await {
        Ok(true) => {
            ctx.site_scope = Some(site_id.to_string());
            Ok(ctx)
        }
        Ok(false) => Err(forbidden_error()),
        Err(err) => Err(storage_error(err)),
    }
}

/// 校验权限码
pub fn require_permission(ctx: &TenantContext, permission: &str) -> Result<(), Response> {
    if ctx.has_permission(permission) {
        Ok(())
    } else {
        Err(forbidden_error())
    }
}

#[cfg(test)]
mod tests {
    use super::bearer_token;
    use axum::http::{HeaderMap, HeaderValue, header};

    #[test]
    fn bearer_token_extracts() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer token-1"),
        );
        assert_eq!(bearer_token(&headers), Some("token-1"));
    }

    #[test]
    fn bearer_token_requires_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("token-1"));
        assert_eq!(bearer_token(&headers), None);
    }
}
