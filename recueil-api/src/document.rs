/// Document trait 是所有内容文档的基础trait
///
/// 每种文档类型在文档库中通过 `_type` 字段区分。
pub trait Document: Send + Sync {
    /// 文档类型（对应 `_type`）
    const TYPE: &'static str;

    /// 文档ID（对应 `_id`）
    fn id(&self) -> &str;
}
