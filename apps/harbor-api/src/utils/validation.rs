//! 输入验证辅助函数
//!
//! - normalize_required / normalize_optional：去除首尾空格并检查非空
//! - parse_vendor / parse_action / parse_lock_state：解析稳定编码，失败返回 400

use crate::utils::response::bad_request_error;
use axum::response::Response;
use domain::{LockAction, LockState, VendorKind};

/// 访问日志单次查询上限
pub const ACCESS_LOG_MAX_LIMIT: i64 = 500;
pub const ACCESS_LOG_DEFAULT_LIMIT: i64 = 100;

/// 验证必填字段，去除空格并检查非空
pub fn normalize_required(value: String, field: &str) -> Result<String, Response> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(bad_request_error(format!("{field} required")));
    }
    Ok(trimmed.to_string())
}

/// 验证可选字段，如果提供则去除空格并检查非空
pub fn normalize_optional(value: Option<String>, field: &str) -> Result<Option<String>, Response> {
    match value {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(bad_request_error(format!("{field} required")));
            }
            Ok(Some(trimmed.to_string()))
        }
        None => Ok(None),
    }
}

pub fn parse_vendor(value: &str) -> Result<VendorKind, Response> {
    VendorKind::parse(value)
        .ok_or_else(|| bad_request_error(format!("unsupported vendor: {value}")))
}

pub fn parse_action(value: &str) -> Result<LockAction, Response> {
    LockAction::parse(value)
        .ok_or_else(|| bad_request_error(format!("unsupported action: {value}")))
}

/// 人工纠正只接受已知状态
pub fn parse_lock_state(value: &str) -> Result<LockState, Response> {
    match LockState::parse(value) {
        Some(state) if state.is_known() => Ok(state),
        _ => Err(bad_request_error("state must be locked or unlocked")),
    }
}

/// 日志查询条数：缺省 100，最多 500
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(value) if value > 0 => value.min(ACCESS_LOG_MAX_LIMIT),
        _ => ACCESS_LOG_DEFAULT_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_bounded() {
        assert_eq!(clamp_limit(None), ACCESS_LOG_DEFAULT_LIMIT);
        assert_eq!(clamp_limit(Some(0)), ACCESS_LOG_DEFAULT_LIMIT);
        assert_eq!(clamp_limit(Some(10_000)), ACCESS_LOG_MAX_LIMIT);
        assert_eq!(clamp_limit(Some(7)), 7);
    }

    #[test]
    fn unknown_state_is_not_a_correction() {
        assert!(parse_lock_state("unknown").is_err());
        assert!(matches!(parse_lock_state(" Locked "), Ok(LockState::Locked)));
    }
}
