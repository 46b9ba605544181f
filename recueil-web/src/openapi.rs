use axum::Json;
use utoipa::OpenApi;

use crate::error::ErrorBody;
use crate::handlers::{
    categories, filters, health, recipes, CountResponse, FilterOption, FiltersResponse,
    PortionResponse,
};

/// OpenAPI文档配置
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        recipes::list_recipes,
        recipes::count_recipes,
        recipes::get_recipe,
        recipes::get_recipe_portions,
        categories::list_categories,
        filters::get_filters,
    ),
    components(schemas(
        recueil_domain::RecipeSummary,
        recueil_domain::RecipeDetail,
        recueil_domain::Category,
        recueil_domain::ContentBlock,
        recueil_service::RecipePage,
        recueil_service::ScaledBlock,
        recueil_service::ScaledIngredient,
        CountResponse,
        PortionResponse,
        FilterOption,
        FiltersResponse,
        ErrorBody,
    )),
    tags(
        (name = "health", description = "健康检查端点"),
        (name = "recipes", description = "菜谱列表、详情与份量换算"),
        (name = "categories", description = "分类端点"),
    ),
    info(
        title = "Recueil API",
        description = "菜谱网站的内容接口",
        version = "0.1.0"
    ),
    servers(
        (url = "http://localhost:8080", description = "本地开发服务器"),
    )
)]
pub struct ApiDoc;

/// GET /api/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/recipes",
            "/api/recipes/count",
            "/api/recipes/{slug}",
            "/api/recipes/{slug}/portions",
            "/api/categories",
            "/api/filters",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
