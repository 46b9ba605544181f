use crate::query::{Condition, DocumentQuery};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// 文档库错误
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid query: {0}")]
    Query(String),
}

/// DocumentStore trait 定义对外部文档库的只读查询能力
///
/// 返回的文档已经按照查询中的投影整形。
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 执行查询，返回过滤、排序、截断后的文档
    async fn query(&self, query: &DocumentQuery) -> Result<Vec<Value>, StoreError>;

    /// 统计匹配条件的文档数量
    async fn count(&self, condition: &Condition) -> Result<u64, StoreError>;

    /// 返回第一条匹配的文档
    async fn first(&self, query: &DocumentQuery) -> Result<Option<Value>, StoreError> {
        let query = query.clone().limit(1);
        let mut documents = self.query(&query).await?;
        if documents.is_empty() {
            Ok(None)
        } else {
            Ok(Some(documents.swap_remove(0)))
        }
    }
}
