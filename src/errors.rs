use std::fmt;

#[derive(Debug, Clone)]
pub enum IpQueryError {
    Validation(String),
    SourceUnavailable(String),
    Internal(String),
    FileOperation(String),
    Serialization(String),
    Protocol(String),
}

impl IpQueryError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            IpQueryError::Validation(_) => "E001",
            IpQueryError::SourceUnavailable(_) => "E002",
            IpQueryError::Internal(_) => "E003",
            IpQueryError::FileOperation(_) => "E004",
            IpQueryError::Serialization(_) => "E005",
            IpQueryError::Protocol(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            IpQueryError::Validation(_) => "Validation Error",
            IpQueryError::SourceUnavailable(_) => "Lookup Source Unavailable",
            IpQueryError::Internal(_) => "Internal Error",
            IpQueryError::FileOperation(_) => "File Operation Error",
            IpQueryError::Serialization(_) => "Serialization Error",
            IpQueryError::Protocol(_) => "Protocol Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            IpQueryError::Validation(msg) => msg,
            IpQueryError::SourceUnavailable(msg) => msg,
            IpQueryError::Internal(msg) => msg,
            IpQueryError::FileOperation(msg) => msg,
            IpQueryError::Serialization(msg) => msg,
            IpQueryError::Protocol(msg) => msg,
        }
    }
}

impl fmt::Display for IpQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for IpQueryError {}

// 便捷的构造函数
impl IpQueryError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        IpQueryError::Validation(msg.into())
    }

    pub fn source_unavailable<T: Into<String>>(msg: T) -> Self {
        IpQueryError::SourceUnavailable(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        IpQueryError::Internal(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        IpQueryError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        IpQueryError::Serialization(msg.into())
    }

    pub fn protocol<T: Into<String>>(msg: T) -> Self {
        IpQueryError::Protocol(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for IpQueryError {
    fn from(err: std::io::Error) -> Self {
        IpQueryError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for IpQueryError {
    fn from(err: serde_json::Error) -> Self {
        IpQueryError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IpQueryError>;
