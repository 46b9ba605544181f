use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecueilError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging error: {0}")]
    Logging(String),

    /// 应用状态初始化失败（文档库、种子数据）
    #[error(transparent)]
    Startup(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RecueilError>;
