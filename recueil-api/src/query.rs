use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Condition 表示查询条件
///
/// 所有值都以绑定参数的形式携带，文档库实现负责安全地传递这些值，
/// 永远不会把它们拼接进查询文本。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Condition {
    /// 空条件（匹配所有）
    Empty,

    /// AND条件
    And {
        left: Box<Condition>,
        right: Box<Condition>,
    },

    /// OR条件
    Or {
        left: Box<Condition>,
        right: Box<Condition>,
    },

    /// NOT条件
    Not {
        condition: Box<Condition>,
    },

    /// 等于条件
    Equal {
        field: String,
        value: Value,
    },

    /// 小于条件
    LessThan {
        field: String,
        bound: Value,
        inclusive: bool,
    },

    /// 大于条件
    GreaterThan {
        field: String,
        bound: Value,
        inclusive: bool,
    },

    /// 按词前缀匹配（不区分大小写）
    ///
    /// 前缀中的每个词都必须是字段中某个词的前缀。
    StartsWith {
        field: String,
        prefix: String,
    },
}

impl Condition {
    /// 创建空条件
    pub fn empty() -> Self {
        Self::Empty
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// AND组合，空条件会被吸收
    pub fn and(self, other: Condition) -> Self {
        match (self, other) {
            (Self::Empty, other) => other,
            (this, Self::Empty) => this,
            (this, other) => Self::And {
                left: Box::new(this),
                right: Box::new(other),
            },
        }
    }

    /// OR组合
    pub fn or(self, other: Condition) -> Self {
        Self::Or {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// NOT取反
    pub fn not(self) -> Self {
        Self::Not {
            condition: Box::new(self),
        }
    }
}

/// Queries 提供查询构建工具函数
pub mod queries {
    use super::Condition;
    use serde_json::Value;

    /// 创建等于条件
    pub fn equal(field: impl Into<String>, value: impl Into<Value>) -> Condition {
        Condition::Equal {
            field: field.into(),
            value: value.into(),
        }
    }

    /// 创建小于条件
    pub fn less_than(field: impl Into<String>, bound: impl Into<Value>, inclusive: bool) -> Condition {
        Condition::LessThan {
            field: field.into(),
            bound: bound.into(),
            inclusive,
        }
    }

    /// 创建大于条件
    pub fn greater_than(field: impl Into<String>, bound: impl Into<Value>, inclusive: bool) -> Condition {
        Condition::GreaterThan {
            field: field.into(),
            bound: bound.into(),
            inclusive,
        }
    }

    /// 创建前缀匹配条件
    pub fn starts_with(field: impl Into<String>, prefix: impl Into<String>) -> Condition {
        Condition::StartsWith {
            field: field.into(),
            prefix: prefix.into(),
        }
    }

    /// 文档类型条件
    pub fn type_is(doc_type: &str) -> Condition {
        equal("_type", doc_type)
    }

    /// 将多个条件以AND组合
    pub fn all_of(conditions: impl IntoIterator<Item = Condition>) -> Condition {
        conditions
            .into_iter()
            .fold(Condition::empty(), Condition::and)
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// 排序字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    pub direction: Direction,
}

impl SortField {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// 投影中的单个字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    /// 原样复制字段
    Plain(String),
    /// 解引用 `{_ref}` 指向的文档并投影其字段
    Deref { name: String, fields: Vec<Field> },
    /// 对嵌套对象继续投影
    Nested { name: String, fields: Vec<Field> },
}

impl Field {
    pub fn plain(name: impl Into<String>) -> Self {
        Self::Plain(name.into())
    }

    pub fn deref(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::Deref {
            name: name.into(),
            fields,
        }
    }

    pub fn nested(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::Nested {
            name: name.into(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Field::Plain(name) => name,
            Field::Deref { name, .. } | Field::Nested { name, .. } => name,
        }
    }
}

/// Projection 描述查询结果的形状
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Projection {
    pub fields: Vec<Field>,
}

impl Projection {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }
}

/// DocumentQuery 是发给文档库的完整查询：过滤、排序、数量限制和投影
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentQuery {
    pub condition: Condition,
    pub sort: Vec<SortField>,
    pub limit: Option<usize>,
    pub projection: Option<Projection>,
}

impl Default for Condition {
    fn default() -> Self {
        Self::Empty
    }
}

impl DocumentQuery {
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            ..Default::default()
        }
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.sort.push(SortField::new(field, direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn project(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }
}
