use recueil_domain::content::constant::{DEFAULT_INGREDIENTS_TITLE, DEFAULT_STEPS_TITLE};
use recueil_domain::{ContentBlock, StepEntry};
use serde::Serialize;
use utoipa::ToSchema;

use super::counter::ServingCounter;
use super::scale::ScaledIngredient;

/// 换算后的内容块，顺序与原文一致
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "_type")]
pub enum ScaledBlock {
    #[serde(rename = "textBlock")]
    Text {
        #[serde(rename = "_key")]
        key: String,
        title: Option<String>,
        text: String,
    },

    #[serde(rename = "ingredientsBlock")]
    Ingredients {
        #[serde(rename = "_key")]
        key: String,
        title: String,
        ingredients: Vec<ScaledIngredient>,
        /// 份量被调整时的提示
        note: Option<String>,
    },

    #[serde(rename = "stepsBlock")]
    Steps {
        #[serde(rename = "_key")]
        key: String,
        title: String,
        steps: Vec<StepEntry>,
    },
}

/// PortionCalculator 把同一个份量计数器应用到菜谱的所有配料块
pub struct PortionCalculator;

impl PortionCalculator {
    pub fn scale(content: &[ContentBlock], counter: &ServingCounter) -> Vec<ScaledBlock> {
        content
            .iter()
            .map(|block| Self::scale_block(block, counter))
            .collect()
    }

    fn scale_block(block: &ContentBlock, counter: &ServingCounter) -> ScaledBlock {
        match block {
            ContentBlock::Text { key, title, text } => ScaledBlock::Text {
                key: key.clone(),
                title: title.clone(),
                text: text.clone(),
            },
            ContentBlock::Ingredients {
                key,
                title,
                ingredients,
            } => ScaledBlock::Ingredients {
                key: key.clone(),
                title: title_or(title, DEFAULT_INGREDIENTS_TITLE),
                ingredients: ingredients
                    .iter()
                    .map(|entry| ScaledIngredient::scale(entry, counter))
                    .collect(),
                note: counter.adjustment_note(),
            },
            ContentBlock::Steps { key, title, steps } => ScaledBlock::Steps {
                key: key.clone(),
                title: title_or(title, DEFAULT_STEPS_TITLE),
                steps: steps.clone(),
            },
        }
    }

    /// 有配料块时才显示份量调节器
    pub fn has_ingredients(content: &[ContentBlock]) -> bool {
        content.iter().any(ContentBlock::is_ingredients)
    }
}

fn title_or(title: &Option<String>, fallback: &str) -> String {
    title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
