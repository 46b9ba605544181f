pub mod category_service;
pub mod recipe_feed;
pub mod recipe_service;

pub use category_service::{CachedCategoryService, CategoryService, DefaultCategoryService};
pub use recipe_feed::{load_more, FeedUpdate, LoadTicket, RecipeFeed};
pub use recipe_service::{Cursor, DefaultRecipeService, RecipePage, RecipeQuery, RecipeService, SortOrder};
