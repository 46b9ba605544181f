pub mod block;
pub mod category;
pub mod recipe;
pub mod serde_ext;
pub mod slug;

pub use block::{ContentBlock, IngredientEntry, StepEntry};
pub use category::{Category, CategoryRef, Slug};
pub use recipe::{
    AssetRef, Difficulty, Hotspot, ImageRef, RecipeDetail, RecipeSummary, VideoAsset, VideoRef,
};
pub use serde_ext::Timestamp;
pub use slug::slugify;

/// 内容相关的常量
pub mod constant {
    // 文档类型
    pub const RECIPE_TYPE: &str = "recipe";
    pub const CATEGORY_TYPE: &str = "category";

    // 列表分页大小（固定值）
    pub const RECIPES_PER_PAGE: usize = 12;

    // slug 最大长度
    pub const SLUG_MAX_LENGTH: usize = 96;

    // 内容块默认标题
    pub const DEFAULT_INGREDIENTS_TITLE: &str = "Zutaten";
    pub const DEFAULT_STEPS_TITLE: &str = "Zubereitung";

    /// 编辑端提供的固定单位词表（单位也可以是自由文本）
    pub const UNIT_VOCABULARY: &[&str] = &[
        "g",
        "kg",
        "ml",
        "l",
        "TL",
        "EL",
        "Stück",
        "Prise",
        "Tasse",
        "Bund",
        "Packung",
        "nach Geschmack",
    ];
}
