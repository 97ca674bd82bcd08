use thiserror::Error;

/// 升级外呼系统错误类型定义
#[derive(Debug, Error)]
pub enum EscalatorError {
    #[error("对象存储错误: {0}")]
    Storage(String),

    #[error("对象不存在: {key}")]
    ObjectNotFound { key: String },

    #[error("名册工作表不存在: {sheet}")]
    SheetNotFound { sheet: String },

    #[error("名册格式错误: {0}")]
    RosterFormat(String),

    #[error("呼叫日志格式错误: {0}")]
    CallLogFormat(String),

    #[error("电话网关错误: {0}")]
    Telephony(String),

    #[error("事件批次格式错误: {0}")]
    MalformedBatch(String),

    #[error("事件批次中未找到关联ID")]
    NoCorrelationId,

    #[error("最新运行指针不存在: {key}")]
    PointerNotFound { key: String },

    #[error("呼叫日志中未找到匹配的关联ID行: {correlation_id}")]
    NoMatchingRow { correlation_id: String },

    #[error("升级调用失败: {0}")]
    Invocation(String),

    #[error("序列化错误: {0}")]
    Serialization(String),

    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 错误分类，调用方据此分支而不是匹配错误文本
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 输入数据问题（名册、事件批次）
    Input,
    /// 外部依赖失败（对象存储、电话网关、调用器）
    Dependency,
    /// 关联失败（缺少关联ID、缺少指针、无匹配行）
    Correlation,
    /// 配置或内部错误
    Internal,
}

pub type EscalatorResult<T> = Result<T, EscalatorError>;

impl EscalatorError {
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }
    pub fn object_not_found<S: Into<String>>(key: S) -> Self {
        Self::ObjectNotFound { key: key.into() }
    }
    pub fn pointer_not_found<S: Into<String>>(key: S) -> Self {
        Self::PointerNotFound { key: key.into() }
    }
    pub fn no_matching_row<S: Into<String>>(correlation_id: S) -> Self {
        Self::NoMatchingRow {
            correlation_id: correlation_id.into(),
        }
    }
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    pub fn kind(&self) -> ErrorKind {
        match self {
            EscalatorError::SheetNotFound { .. }
            | EscalatorError::RosterFormat(_)
            | EscalatorError::CallLogFormat(_)
            | EscalatorError::MalformedBatch(_)
            | EscalatorError::Serialization(_) => ErrorKind::Input,
            EscalatorError::Storage(_)
            | EscalatorError::ObjectNotFound { .. }
            | EscalatorError::Telephony(_)
            | EscalatorError::Invocation(_) => ErrorKind::Dependency,
            EscalatorError::NoCorrelationId
            | EscalatorError::PointerNotFound { .. }
            | EscalatorError::NoMatchingRow { .. } => ErrorKind::Correlation,
            EscalatorError::Configuration(_) | EscalatorError::Internal(_) => ErrorKind::Internal,
        }
    }
    pub fn is_correlation_error(&self) -> bool {
        self.kind() == ErrorKind::Correlation
    }
    /// 平台层可以重试的错误；本系统内部从不自动重试
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EscalatorError::Storage(_) | EscalatorError::Telephony(_) | EscalatorError::Invocation(_)
        )
    }
}

impl From<serde_json::Error> for EscalatorError {
    fn from(err: serde_json::Error) -> Self {
        EscalatorError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for EscalatorError {
    fn from(err: std::io::Error) -> Self {
        EscalatorError::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for EscalatorError {
    fn from(err: anyhow::Error) -> Self {
        EscalatorError::Internal(err.to_string())
    }
}
