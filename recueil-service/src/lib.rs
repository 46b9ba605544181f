pub mod content;
pub mod error;
pub mod portion;

pub use content::{
    CategoryService, DefaultCategoryService, CachedCategoryService,
    RecipeService, DefaultRecipeService, RecipeQuery, RecipePage, SortOrder, Cursor,
    RecipeFeed, LoadTicket, FeedUpdate, load_more,
};

pub use error::{ContentError, Result};

pub use portion::{
    ServingCounter, PortionCalculator, ScaledBlock, ScaledIngredient,
    parse_amount, scale_value, format_amount,
};
