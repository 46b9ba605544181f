use recueil_api::Document;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::constant;
use super::serde_ext::null_as_default;

/// Slug（`{ current }`）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct Slug {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1))]
    pub current: String,
}

impl Slug {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
        }
    }
}

/// Category实体
///
/// 分类独立维护，不反向引用菜谱；菜谱通过 `category._ref` 指向分类。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: Slug,
}

impl Document for Category {
    const TYPE: &'static str = constant::CATEGORY_TYPE;

    fn id(&self) -> &str {
        &self.id
    }
}

/// 菜谱中解引用后的分类（`category->{name, slug}`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: Slug,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_from_document() {
        let category: Category = serde_json::from_value(json!({
            "_id": "cat-pasta",
            "_type": "category",
            "name": "Pasta",
            "slug": { "_type": "slug", "current": "pasta" }
        }))
        .unwrap();

        assert_eq!(category.id(), "cat-pasta");
        assert_eq!(category.name, "Pasta");
        assert_eq!(category.slug.current, "pasta");
    }
}
