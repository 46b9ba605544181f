use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use super::recipe::ImageRef;
use super::serde_ext::{amount_string, null_as_default};

/// IngredientEntry 表示一条配料
///
/// `amount` 是文本，可能是 "nach Geschmack" 这类非数字描述。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct IngredientEntry {
    #[serde(default, deserialize_with = "amount_string")]
    pub amount: String,

    #[serde(default)]
    pub unit: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1))]
    pub name: String,
}

impl IngredientEntry {
    pub fn new(amount: impl Into<String>, unit: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            unit: unit.map(str::to_string),
            name: name.into(),
        }
    }
}

/// StepEntry 表示一个制作步骤
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct StepEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1))]
    pub step: String,

    #[serde(default)]
    pub image: Option<ImageRef>,
}

/// ContentBlock 是菜谱正文的模块化内容块，按 `_type` 区分
///
/// 块的顺序由作者决定，按顺序自上而下渲染。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "_type")]
pub enum ContentBlock {
    #[serde(rename = "textBlock")]
    Text {
        #[serde(rename = "_key", default)]
        key: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        text: String,
    },

    #[serde(rename = "ingredientsBlock")]
    Ingredients {
        #[serde(rename = "_key", default)]
        key: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        ingredients: Vec<IngredientEntry>,
    },

    #[serde(rename = "stepsBlock")]
    Steps {
        #[serde(rename = "_key", default)]
        key: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        steps: Vec<StepEntry>,
    },
}

impl ContentBlock {
    pub fn key(&self) -> &str {
        match self {
            ContentBlock::Text { key, .. }
            | ContentBlock::Ingredients { key, .. }
            | ContentBlock::Steps { key, .. } => key,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { title, .. }
            | ContentBlock::Ingredients { title, .. }
            | ContentBlock::Steps { title, .. } => title.as_deref(),
        }
    }

    pub fn is_ingredients(&self) -> bool {
        matches!(self, ContentBlock::Ingredients { .. })
    }

    /// 校验块内的条目
    pub fn validate_entries(&self) -> Result<(), ValidationErrors> {
        match self {
            ContentBlock::Text { .. } => Ok(()),
            ContentBlock::Ingredients { ingredients, .. } => {
                ingredients.iter().try_for_each(Validate::validate)
            }
            ContentBlock::Steps { steps, .. } => steps.iter().try_for_each(Validate::validate),
        }
    }
}
