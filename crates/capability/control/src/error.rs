use harbor_storage::StorageError;

/// 编排层基础设施错误。
///
/// 厂商侧失败不走这里，而是放在 `CommandResult` 中返回并记入门禁日志。
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<StorageError> for ControlError {
    fn from(err: StorageError) -> Self {
        ControlError::Storage(err.to_string())
    }
}
