//! GROQ 编译器
//!
//! 把 `DocumentQuery` 编译成 GROQ 文本和一组绑定参数。所有值都以
//! `$pN` 形式引用，查询文本里只会出现经过校验的字段名。
//!
//! 比较值是 RFC 3339 时间戳时，两侧都包上 `dateTime()`，按时刻而不是按字符串比较，
//! 与内存文档库的语义一致。

use recueil_api::{Condition, DocumentQuery, Field, Projection, StoreError};
use recueil_domain::content::serde_ext::parse_timestamp;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn field_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
            .expect("valid field pattern")
    })
}

/// 编译结果
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub query: String,
    /// 参数名（不含 `$`）到值
    pub params: BTreeMap<String, Value>,
}

/// GroqCompiler 负责单次编译，参数按出现顺序编号
#[derive(Debug, Default)]
pub struct GroqCompiler {
    params: BTreeMap<String, Value>,
}

impl GroqCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// `*[filter] | order(...) [0...N] {projection}`
    pub fn compile_query(mut self, query: &DocumentQuery) -> Result<CompiledQuery, StoreError> {
        let mut text = format!("*[{}]", self.condition(&query.condition)?);

        if !query.sort.is_empty() {
            let orderings = query
                .sort
                .iter()
                .map(|sort| -> Result<String, StoreError> {
                    Ok(format!("{} {}", checked_field(&sort.field)?, sort.direction.as_str()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            text.push_str(&format!(" | order({})", orderings.join(", ")));
        }

        if let Some(limit) = query.limit {
            text.push_str(&format!(" [0...{}]", limit));
        }

        if let Some(projection) = &query.projection {
            text.push(' ');
            text.push_str(&render_projection(projection)?);
        }

        Ok(CompiledQuery {
            query: text,
            params: self.params,
        })
    }

    /// `count(*[filter])`
    pub fn compile_count(mut self, condition: &Condition) -> Result<CompiledQuery, StoreError> {
        let filter = self.condition(condition)?;
        Ok(CompiledQuery {
            query: format!("count(*[{}])", filter),
            params: self.params,
        })
    }

    fn bind(&mut self, value: Value) -> String {
        let name = format!("p{}", self.params.len());
        let placeholder = format!("${}", name);
        self.params.insert(name, value);
        placeholder
    }

    /// `field op $pN`，时间戳值编译为 `dateTime(field) op dateTime($pN)`
    fn comparison(&mut self, field: &str, op: &str, value: &Value) -> Result<String, StoreError> {
        let field = checked_field(field)?;
        let is_timestamp = value
            .as_str()
            .is_some_and(|raw| parse_timestamp(raw).is_some());
        let placeholder = self.bind(value.clone());
        if is_timestamp {
            Ok(format!("dateTime({}) {} dateTime({})", field, op, placeholder))
        } else {
            Ok(format!("{} {} {}", field, op, placeholder))
        }
    }

    fn condition(&mut self, condition: &Condition) -> Result<String, StoreError> {
        let text = match condition {
            Condition::Empty => "true".to_string(),
            Condition::And { left, right } => {
                format!("({} && {})", self.condition(left)?, self.condition(right)?)
            }
            Condition::Or { left, right } => {
                format!("({} || {})", self.condition(left)?, self.condition(right)?)
            }
            Condition::Not { condition } => format!("!({})", self.condition(condition)?),
            Condition::Equal { field, value } => self.comparison(field, "==", value)?,
            Condition::LessThan {
                field,
                bound,
                inclusive,
            } => {
                let op = if *inclusive { "<=" } else { "<" };
                self.comparison(field, op, bound)?
            }
            Condition::GreaterThan {
                field,
                bound,
                inclusive,
            } => {
                let op = if *inclusive { ">=" } else { ">" };
                self.comparison(field, op, bound)?
            }
            Condition::StartsWith { field, prefix } => {
                let field = checked_field(field)?;
                let pattern = Value::String(format!("{}*", prefix));
                format!("{} match {}", field, self.bind(pattern))
            }
        };
        Ok(text)
    }
}

fn checked_field(field: &str) -> Result<&str, StoreError> {
    if field_pattern().is_match(field) {
        Ok(field)
    } else {
        Err(StoreError::Query(format!("Invalid field name: {:?}", field)))
    }
}

fn render_projection(projection: &Projection) -> Result<String, StoreError> {
    let fields = projection
        .fields
        .iter()
        .map(render_field)
        .collect::<Result<Vec<_>, StoreError>>()?;
    Ok(format!("{{{}}}", fields.join(", ")))
}

fn render_field(field: &Field) -> Result<String, StoreError> {
    match field {
        Field::Plain(name) => Ok(checked_field(name)?.to_string()),
        Field::Deref { name, fields } => Ok(format!(
            "\"{name}\": {name}->{}",
            render_projection(&Projection::new(fields.clone()))?,
            name = checked_field(name)?
        )),
        Field::Nested { name, fields } => Ok(format!(
            "\"{name}\": {name}{}",
            render_projection(&Projection::new(fields.clone()))?,
            name = checked_field(name)?
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recueil_api::query::queries;
    use recueil_api::Direction;
    use serde_json::json;

    #[test]
    fn test_compile_listing_query() {
        let query = DocumentQuery::new(queries::all_of(vec![
            queries::type_is("recipe"),
            queries::equal("difficulty", "einfach"),
        ]))
        .order_by("publishedAt", Direction::Asc)
        .order_by("_id", Direction::Asc)
        .limit(12)
        .project(Projection::new(vec![
            Field::plain("_id"),
            Field::deref("category", vec![Field::plain("name"), Field::plain("slug")]),
        ]));

        let compiled = GroqCompiler::new().compile_query(&query).unwrap();
        assert_eq!(
            compiled.query,
            "*[(_type == $p0 && difficulty == $p1)] | order(publishedAt asc, _id asc) [0...12] \
             {_id, \"category\": category->{name, slug}}"
        );
        assert_eq!(compiled.params["p0"], json!("recipe"));
        assert_eq!(compiled.params["p1"], json!("einfach"));
    }

    #[test]
    fn test_compile_count() {
        let condition = queries::type_is("recipe")
            .and(queries::starts_with("title", "Pasta").or(queries::starts_with("description", "Pasta")));
        let compiled = GroqCompiler::new().compile_count(&condition).unwrap();

        assert_eq!(
            compiled.query,
            "count(*[(_type == $p0 && (title match $p1 || description match $p2))])"
        );
        assert_eq!(compiled.params["p1"], json!("Pasta*"));
    }

    #[test]
    fn test_hostile_input_stays_out_of_query_text() {
        let hostile = "\"] | *[_type == \"secret\"";
        let condition = queries::type_is("recipe")
            .and(queries::equal("category._ref", hostile))
            .and(queries::less_than("publishedAt", hostile, false));
        let compiled = GroqCompiler::new().compile_count(&condition).unwrap();

        assert!(!compiled.query.contains("secret"));
        assert!(!compiled.query.contains('"'));
        assert_eq!(compiled.params["p1"], json!(hostile));
        assert_eq!(compiled.params["p2"], json!(hostile));
    }

    #[test]
    fn test_timestamp_bounds_compare_as_datetimes() {
        let cursor = "2024-01-01T10:00:12.000500Z";
        let condition = queries::less_than("publishedAt", cursor, false).or(
            queries::equal("publishedAt", cursor).and(queries::less_than("_id", "r12", false)),
        );
        let compiled = GroqCompiler::new().compile_count(&condition).unwrap();

        assert_eq!(
            compiled.query,
            "count(*[(dateTime(publishedAt) < dateTime($p0) || \
             (dateTime(publishedAt) == dateTime($p1) && _id < $p2))])"
        );
        assert_eq!(compiled.params["p0"], json!(cursor));
        assert_eq!(compiled.params["p2"], json!("r12"));
    }

    #[test]
    fn test_invalid_field_name_is_rejected() {
        let condition = queries::equal("title] | *[true", "x");
        let result = GroqCompiler::new().compile_count(&condition);
        assert!(matches!(result, Err(StoreError::Query(_))));
    }

    #[test]
    fn test_empty_condition_matches_everything() {
        let compiled = GroqCompiler::new()
            .compile_query(&DocumentQuery::default())
            .unwrap();
        assert_eq!(compiled.query, "*[true]");
        assert!(compiled.params.is_empty());
    }
}
