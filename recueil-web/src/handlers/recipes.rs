use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use recueil_domain::RecipeDetail;
use recueil_service::{
    Cursor, PortionCalculator, RecipePage, RecipeQuery, ScaledBlock, ServingCounter, SortOrder,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ErrorBody};
use crate::extractors::ApiQuery;
use crate::AppState;

/// 列表查询参数
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RecipeListParams {
    /// 标题或描述的前缀
    pub search: Option<String>,
    /// 分类文档ID
    pub category: Option<String>,
    /// einfach | fortgeschritten | professionell
    pub difficulty: Option<String>,
    /// newest（默认）| oldest
    pub sort: Option<String>,
    /// 上一页最后一条的发布时间
    pub last_published_at: Option<String>,
    /// 上一页最后一条的ID，用于区分相同的发布时间
    pub last_id: Option<String>,
}

impl RecipeListParams {
    pub fn to_query(&self) -> RecipeQuery {
        let cursor = self
            .last_published_at
            .as_ref()
            .map(|published_at| Cursor::new(published_at.clone(), self.last_id.clone()));
        RecipeQuery {
            search: self.search.clone(),
            category: self.category.clone(),
            difficulty: self.difficulty.clone(),
            sort: SortOrder::parse(self.sort.as_deref()),
            cursor,
        }
    }
}

/// 计数查询参数
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeCountParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

impl RecipeCountParams {
    pub fn to_query(&self) -> RecipeQuery {
        RecipeQuery {
            search: self.search.clone(),
            category: self.category.clone(),
            difficulty: self.difficulty.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CountResponse {
    pub count: u64,
}

/// 份量换算参数
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PortionParams {
    /// 目标份量，默认使用菜谱的原始份量
    pub servings: Option<u32>,
}

/// 份量换算结果
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortionResponse {
    pub slug: String,
    pub original_servings: u32,
    pub current_servings: u32,
    pub servings_label: String,
    pub adjustment_note: Option<String>,
    pub has_ingredients: bool,
    pub blocks: Vec<ScaledBlock>,
}

/// 列出菜谱
/// GET /api/recipes
#[utoipa::path(
    get,
    path = "/api/recipes",
    params(RecipeListParams),
    responses(
        (status = 200, description = "一页菜谱", body = RecipePage),
        (status = 500, description = "文档库不可用", body = ErrorBody)
    ),
    tag = "recipes"
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<RecipeListParams>,
) -> Result<Response, ApiError> {
    let page = state
        .recipe_service
        .list(&params.to_query())
        .await
        .map_err(ApiError::internal("Failed to fetch recipes"))?;
    Ok(Json(page).into_response())
}

/// 统计菜谱数量
/// GET /api/recipes/count
#[utoipa::path(
    get,
    path = "/api/recipes/count",
    params(RecipeCountParams),
    responses(
        (status = 200, description = "匹配数量", body = CountResponse),
        (status = 500, description = "文档库不可用", body = ErrorBody)
    ),
    tag = "recipes"
)]
pub async fn count_recipes(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<RecipeCountParams>,
) -> Result<Response, ApiError> {
    let count = state
        .recipe_service
        .count(&params.to_query())
        .await
        .map_err(ApiError::internal("Failed to fetch recipe count"))?;
    Ok(Json(CountResponse { count }).into_response())
}

async fn find_recipe(state: &AppState, slug: &str) -> Result<RecipeDetail, ApiError> {
    state
        .recipe_service
        .get_by_slug(slug)
        .await
        .map_err(ApiError::internal("Failed to fetch recipe"))?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))
}

/// 获取菜谱详情
/// GET /api/recipes/{slug}
#[utoipa::path(
    get,
    path = "/api/recipes/{slug}",
    params(("slug" = String, Path, description = "菜谱 slug")),
    responses(
        (status = 200, description = "菜谱详情", body = RecipeDetail),
        (status = 404, description = "不存在", body = ErrorBody),
        (status = 500, description = "文档库不可用", body = ErrorBody)
    ),
    tag = "recipes"
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let recipe = find_recipe(&state, &slug).await?;
    Ok(Json(recipe).into_response())
}

/// 按目标份量换算配料
/// GET /api/recipes/{slug}/portions
#[utoipa::path(
    get,
    path = "/api/recipes/{slug}/portions",
    params(("slug" = String, Path, description = "菜谱 slug"), PortionParams),
    responses(
        (status = 200, description = "换算后的内容块", body = PortionResponse),
        (status = 400, description = "份量不合法", body = ErrorBody),
        (status = 404, description = "不存在", body = ErrorBody),
        (status = 500, description = "文档库不可用", body = ErrorBody)
    ),
    tag = "recipes"
)]
pub async fn get_recipe_portions(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ApiQuery(params): ApiQuery<PortionParams>,
) -> Result<Response, ApiError> {
    if params.servings == Some(0) {
        return Err(ApiError::BadRequest("servings must be at least 1".to_string()));
    }

    let recipe = find_recipe(&state, &slug).await?;
    let original = recipe.summary.servings;
    let counter = ServingCounter::with_current(original, params.servings.unwrap_or(original));

    let response = PortionResponse {
        slug: recipe.summary.slug.current.clone(),
        original_servings: counter.original(),
        current_servings: counter.current(),
        servings_label: counter.servings_label().to_string(),
        adjustment_note: counter.adjustment_note(),
        has_ingredients: PortionCalculator::has_ingredients(&recipe.content),
        blocks: PortionCalculator::scale(&recipe.content, &counter),
    };
    Ok(Json(response).into_response())
}
