//! 认证能力：校验上游签发的 access token 并还原 TenantContext。
//!
//! 登录与账号管理由上游认证服务负责；本模块只做 JWT 编解码。

mod jwt;

pub use jwt::JwtManager;

/// 认证相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token expired")]
    TokenExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("internal error: {0}")]
    Internal(String),
}
