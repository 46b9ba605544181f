use recueil_service::{CategoryService, RecipeService};
use std::sync::Arc;

/// 应用状态
/// 包含所有需要的服务实例
#[derive(Clone)]
pub struct AppState {
    pub recipe_service: Arc<dyn RecipeService>,
    pub category_service: Arc<dyn CategoryService>,
}

impl AppState {
    pub fn new(
        recipe_service: Arc<dyn RecipeService>,
        category_service: Arc<dyn CategoryService>,
    ) -> Self {
        Self {
            recipe_service,
            category_service,
        }
    }
}
