use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqlChainError {
    /// 当前语句类型或条件状态不允许调用该方法
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    /// 生成的 SQL 中占位符数量与绑定参数数量不一致
    #[error("Invalid number of query parameters: {placeholders} placeholder(s), {params} parameter(s)")]
    ParameterMismatch { placeholders: usize, params: usize },
    /// Value that cannot be used as a bind parameter
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),
}

impl SqlChainError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SqlChainError::InvalidOperation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SqlChainError>;
