use crate::AuthError;
use domain::TenantContext;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

// 仅接受 access 类型，拒绝 refresh 等其他 token。
const ACCESS_TOKEN_TYPE: &str = "access";

#[derive(Debug, Serialize, Deserialize)]
/// JWT 内部 claims。
struct Claims {
    sub: String,
    tenant_id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    permissions: Vec<String>,
    /// 限定可访问的站点（泊位/船艇），缺省表示租户内全部站点。
    #[serde(default)]
    site_scope: Option<String>,
    exp: usize,
    token_type: String,
}

/// JWT 生成与校验。
#[derive(Clone)]
pub struct JwtManager {
    secret: Vec<u8>,
    access_ttl_seconds: u64,
}

impl JwtManager {
    /// 创建 JWT 管理器。
    pub fn new(secret: String, access_ttl_seconds: u64) -> Self {
        Self {
            secret: secret.into_bytes(),
            access_ttl_seconds,
        }
    }

    /// 基于 TenantContext 签发 access token（联调与测试使用）。
    pub fn issue_access_token(&self, ctx: &TenantContext) -> Result<String, AuthError> {
        let exp = (now_epoch_seconds() + self.access_ttl_seconds) as usize;
        let claims = Claims {
            sub: ctx.user_id.clone(),
            tenant_id: ctx.tenant_id.clone(),
            display_name: ctx.display_name.clone(),
            roles: ctx.roles.clone(),
            permissions: ctx.permissions.clone(),
            site_scope: ctx.site_scope.clone(),
            exp,
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|err| AuthError::Internal(err.to_string()))
    }

    /// 解析 access token。
    pub fn decode_access(&self, token: &str) -> Result<TenantContext, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let decoded = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map_err(map_jwt_error)?
        .claims;
        if decoded.token_type != ACCESS_TOKEN_TYPE || decoded.tenant_id.trim().is_empty() {
            return Err(AuthError::TokenInvalid);
        }
        let ctx = TenantContext::new(
            decoded.tenant_id,
            decoded.sub,
            decoded.roles,
            decoded.permissions,
            decoded.site_scope,
        );
        Ok(match decoded.display_name {
            Some(name) => ctx.with_display_name(name),
            None => ctx,
        })
    }
}

/// 当前时间戳（秒）。
fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// 将 jwt 库错误映射为业务错误。
fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
    }
}
