use std::io;
use thiserror::Error;

// 错误类别，对应调用方可以采取的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    // 文档无法解码
    Parse,
    // 缺少或非法的字段
    Validation,
    // 名称重复
    Conflict,
    // 名称不存在
    NotFound,
    // 当前来源类型不允许该操作
    InvalidOperation,
    // 存储不可读写
    Io,
    // 其他内部错误
    Internal,
}

impl ErrorKind {
    // 指标标签
    pub fn as_label(&self) -> &'static str {
        match self {
            ErrorKind::Parse => "parse",
            ErrorKind::Validation => "validation",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidOperation => "invalid_operation",
            ErrorKind::Io => "io",
            ErrorKind::Internal => "internal",
        }
    }
}

// Unified error type
#[derive(Error, Debug)]
pub enum AppError {
    // 已存储的配置文档无法读取或解析
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // 调用方提交的配置文档被拒绝
    #[error("Invalid configuration: {0}")]
    InvalidDocument(ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // 请求体无法解码
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("List already exists: {0}")]
    ListAlreadyExists(String),

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Cannot edit URL-based list: {0}")]
    ReadOnlyList(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid shutdown timeout, must be between 1 and 120 seconds")]
    InvalidShutdownTimeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    // 归类错误
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Config(err) | AppError::InvalidDocument(err) => err.kind(),
            AppError::Io(_) => ErrorKind::Io,
            AppError::InvalidBody(_) => ErrorKind::Parse,
            AppError::InvalidRequest(_) | AppError::InvalidShutdownTimeout => {
                ErrorKind::Validation
            }
            AppError::ListAlreadyExists(_) => ErrorKind::Conflict,
            AppError::ListNotFound(_) | AppError::UnknownAction(_) => ErrorKind::NotFound,
            AppError::ReadOnlyList(_) => ErrorKind::InvalidOperation,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    // 把存储层错误标记为调用方提交内容的问题
    pub fn rejected(err: ConfigError) -> Self {
        match err {
            ConfigError::LoadError(_) | ConfigError::SerializeError(_) => AppError::Config(err),
            _ => AppError::InvalidDocument(err),
        }
    }
}

// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access configuration file: {0}")]
    LoadError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::LoadError(_) => ErrorKind::Io,
            ConfigError::ParseError(_) => ErrorKind::Parse,
            ConfigError::SerializeError(_) => ErrorKind::Internal,
            ConfigError::ValidationError(_) => ErrorKind::Validation,
        }
    }
}
