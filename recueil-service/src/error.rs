use recueil_api::StoreError;
use thiserror::Error;

/// 内容服务错误
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Document store error: {0}")]
    Fetch(#[from] StoreError),

    #[error("Malformed document: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ContentError>;
