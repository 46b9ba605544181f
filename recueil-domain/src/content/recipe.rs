use recueil_api::Document;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use super::block::ContentBlock;
use super::category::{CategoryRef, Slug};
use super::constant;
use super::serde_ext::{null_as_default, Timestamp};

/// Difficulty 表示菜谱难度
///
/// 序列化值沿用编辑端的取值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Difficulty {
    #[serde(rename = "einfach")]
    Easy,
    #[serde(rename = "fortgeschritten")]
    Advanced,
    #[serde(rename = "professionell")]
    Professional,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Advanced, Difficulty::Professional];

    /// 存储值
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "einfach",
            Difficulty::Advanced => "fortgeschritten",
            Difficulty::Professional => "professionell",
        }
    }

    /// 展示标签
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Einfach",
            Difficulty::Advanced => "Fortgeschritten",
            Difficulty::Professional => "Professionell",
        }
    }
}

/// 图片资源引用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AssetRef {
    #[serde(rename = "_ref")]
    pub reference: String,
}

/// 图片热点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
    pub height: f64,
    pub width: f64,
}

/// ImageRef 表示图片引用（不做任何图片变换）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImageRef {
    #[serde(default)]
    pub asset: Option<AssetRef>,

    #[serde(default)]
    pub hotspot: Option<Hotspot>,
}

/// 视频资源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VideoAsset {
    #[serde(rename = "playbackId", default)]
    pub playback_id: Option<String>,

    #[serde(rename = "thumbTime", default)]
    pub thumb_time: Option<f64>,
}

/// VideoRef 表示可选的视频引用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VideoRef {
    #[serde(default)]
    pub asset: Option<VideoAsset>,
}

/// RecipeSummary 是列表卡片使用的菜谱投影
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecipeSummary {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1))]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(nested)]
    pub slug: Slug,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1))]
    pub description: String,

    #[serde(rename = "mainImage", default)]
    pub main_image: Option<ImageRef>,

    #[serde(default)]
    #[validate(required)]
    pub category: Option<CategoryRef>,

    /// 准备时间（分钟）
    #[serde(rename = "prepTime", default, deserialize_with = "null_as_default")]
    #[validate(range(min = 1))]
    pub prep_time: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(range(min = 1))]
    pub servings: u32,

    pub difficulty: Difficulty,

    /// 发布时间，同时作为排序与分页游标的键
    #[serde(rename = "publishedAt")]
    #[schema(value_type = String, format = DateTime)]
    pub published_at: Timestamp,
}

impl Document for RecipeSummary {
    const TYPE: &'static str = constant::RECIPE_TYPE;

    fn id(&self) -> &str {
        &self.id
    }
}

/// RecipeDetail 是详情页使用的菜谱投影，包含有序的内容块
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecipeDetail {
    #[serde(flatten)]
    #[validate(nested)]
    pub summary: RecipeSummary,

    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<ContentBlock>,

    #[serde(default)]
    pub video: Option<VideoRef>,
}

impl Document for RecipeDetail {
    const TYPE: &'static str = constant::RECIPE_TYPE;

    fn id(&self) -> &str {
        &self.summary.id
    }
}

impl RecipeDetail {
    /// 校验文档是否满足编辑端的必填与取值约束
    pub fn check(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        for block in &self.content {
            block.validate_entries()?;
        }
        Ok(())
    }

    /// 是否包含配料块（决定是否显示份量调节器）
    pub fn has_ingredients(&self) -> bool {
        self.content.iter().any(ContentBlock::is_ingredients)
    }
}
