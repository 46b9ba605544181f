pub mod content;

pub use content::{
    Category, CategoryRef, Slug,
    RecipeSummary, RecipeDetail, Difficulty, ImageRef, AssetRef, Hotspot, VideoRef, VideoAsset,
    ContentBlock, IngredientEntry, StepEntry,
    slugify, Timestamp,
};
