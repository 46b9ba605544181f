use async_trait::async_trait;
use recueil_api::{Condition, Direction, DocumentQuery, DocumentStore, Field, SortField, StoreError};
use recueil_domain::content::constant::{CATEGORY_TYPE, RECIPE_TYPE};
use recueil_domain::content::serde_ext::parse_timestamp;
use recueil_domain::slugify;
use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// MemoryDocumentStore 在内存中保存 JSON 文档，并直接对 Condition 树求值
///
/// 语义与 Sanity 端保持一致：
/// - 缺失的字段视为 `null`
/// - 两个字符串都是 RFC 3339 时间戳时按时刻比较
/// - `StartsWith` 按词做前缀匹配，不区分大小写
/// - 投影中缺失的字段以 `null` 返回，`->` 通过 `_id` 解引用
pub struct MemoryDocumentStore {
    documents: RwLock<Vec<Value>>,
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::with_documents(Vec::new())
    }

    pub fn with_documents(documents: impl IntoIterator<Item = Value>) -> Self {
        let documents = documents.into_iter().map(prepare_document).collect();
        Self {
            documents: RwLock::new(documents),
        }
    }

    /// 从 JSON 数组文件加载文档
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            StoreError::Transport(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let documents: Vec<Value> = serde_json::from_str(&raw)?;
        info!("Loaded {} documents from {}", documents.len(), path.display());
        Ok(Self::with_documents(documents))
    }

    pub async fn insert(&self, document: Value) {
        self.documents.write().await.push(prepare_document(document));
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn query(&self, query: &DocumentQuery) -> Result<Vec<Value>, StoreError> {
        let documents = self.documents.read().await;

        let mut matched: Vec<&Value> = documents
            .iter()
            .filter(|document| matches(document, &query.condition))
            .collect();
        matched.sort_by(|a, b| compare_documents(a, b, &query.sort));
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        let results: Vec<Value> = matched
            .into_iter()
            .map(|document| match &query.projection {
                Some(projection) => project(document, &projection.fields, &documents),
                None => document.clone(),
            })
            .collect();

        debug!(returned = results.len(), "Memory store query");
        Ok(results)
    }

    async fn count(&self, condition: &Condition) -> Result<u64, StoreError> {
        let documents = self.documents.read().await;
        let count = documents
            .iter()
            .filter(|document| matches(document, condition))
            .count();
        Ok(count as u64)
    }
}

/// 补齐缺失的 slug（菜谱取标题，分类取名称）
fn prepare_document(mut document: Value) -> Value {
    let source_field = match document.get("_type").and_then(Value::as_str) {
        Some(RECIPE_TYPE) => "title",
        Some(CATEGORY_TYPE) => "name",
        _ => return document,
    };

    let has_slug = document
        .pointer("/slug/current")
        .and_then(Value::as_str)
        .is_some_and(|current| !current.is_empty());
    if has_slug {
        return document;
    }

    let Some(slug) = document
        .get(source_field)
        .and_then(Value::as_str)
        .map(slugify)
    else {
        return document;
    };
    if let Some(object) = document.as_object_mut() {
        object.insert("slug".to_string(), json!({ "_type": "slug", "current": slug }));
    }
    document
}

fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(document, |value, key| value.get(key))
}

fn matches(document: &Value, condition: &Condition) -> bool {
    match condition {
        Condition::Empty => true,
        Condition::And { left, right } => matches(document, left) && matches(document, right),
        Condition::Or { left, right } => matches(document, left) || matches(document, right),
        Condition::Not { condition } => !matches(document, condition),
        Condition::Equal { field, value } => {
            let actual = lookup(document, field).unwrap_or(&Value::Null);
            compare_values(actual, value) == Some(Ordering::Equal)
        }
        Condition::LessThan {
            field,
            bound,
            inclusive,
        } => lookup(document, field)
            .and_then(|actual| compare_values(actual, bound))
            .is_some_and(|ordering| {
                ordering == Ordering::Less || (*inclusive && ordering == Ordering::Equal)
            }),
        Condition::GreaterThan {
            field,
            bound,
            inclusive,
        } => lookup(document, field)
            .and_then(|actual| compare_values(actual, bound))
            .is_some_and(|ordering| {
                ordering == Ordering::Greater || (*inclusive && ordering == Ordering::Equal)
            }),
        Condition::StartsWith { field, prefix } => lookup(document, field)
            .and_then(Value::as_str)
            .is_some_and(|text| word_prefix_match(text, prefix)),
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

fn word_prefix_match(text: &str, prefix: &str) -> bool {
    let candidates: Vec<String> = words(text).collect();
    words(prefix).all(|term| candidates.iter().any(|word| word.starts_with(&term)))
}

/// 比较两个同类型的值，类型不同则不可比较
fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => match (parse_timestamp(a), parse_timestamp(b)) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => Some(a.cmp(b)),
        },
        _ => None,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_documents(a: &Value, b: &Value, sort: &[SortField]) -> Ordering {
    for field in sort {
        let left = lookup(a, &field.field).unwrap_or(&Value::Null);
        let right = lookup(b, &field.field).unwrap_or(&Value::Null);
        let ordering = compare_values(left, right)
            .unwrap_or_else(|| type_rank(left).cmp(&type_rank(right)));
        let ordering = match field.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn project(document: &Value, fields: &[Field], all: &[Value]) -> Value {
    let mut projected = Map::new();
    for field in fields {
        let value = match field {
            Field::Plain(name) => document.get(name).cloned().unwrap_or(Value::Null),
            Field::Nested { name, fields } => map_each(document.get(name), |inner| {
                if inner.is_object() {
                    project(inner, fields, all)
                } else {
                    Value::Null
                }
            }),
            Field::Deref { name, fields } => map_each(document.get(name), |reference| {
                dereference(reference, all)
                    .map(|target| project(target, fields, all))
                    .unwrap_or(Value::Null)
            }),
        };
        projected.insert(field.name().to_string(), value);
    }
    Value::Object(projected)
}

// 数组逐个元素应用
fn map_each(value: Option<&Value>, f: impl Fn(&Value) -> Value) -> Value {
    match value {
        None | Some(Value::Null) => Value::Null,
        Some(Value::Array(items)) => Value::Array(items.iter().map(&f).collect()),
        Some(value) => f(value),
    }
}

fn dereference<'a>(reference: &Value, all: &'a [Value]) -> Option<&'a Value> {
    let id = reference.get("_ref")?.as_str()?;
    all.iter()
        .find(|document| document.get("_id").and_then(Value::as_str) == Some(id))
}
