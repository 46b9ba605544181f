use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use recueil_domain::Category;

use crate::error::{ApiError, ErrorBody};
use crate::AppState;

/// 列出分类
/// GET /api/categories
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "按名称排序的分类", body = [Category]),
        (status = 500, description = "文档库不可用", body = ErrorBody)
    ),
    tag = "categories"
)]
pub async fn list_categories(State(state): State<AppState>) -> Result<Response, ApiError> {
    let categories = state
        .category_service
        .list()
        .await
        .map_err(ApiError::internal("Failed to fetch categories"))?;
    Ok(Json(categories).into_response())
}
