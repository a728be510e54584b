use thiserror::Error;

#[derive(Error, Debug)]
pub enum RutestError {
    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("无效的过滤模式: {0}")]
    FilterPattern(#[from] regex::Error),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML 解析错误: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

// Add conversion from anyhow::Error
impl From<anyhow::Error> for RutestError {
    fn from(err: anyhow::Error) -> Self {
        RutestError::Other(err.to_string())
    }
}

/// Result type for rutest crate
pub type Result<T> = std::result::Result<T, RutestError>;
