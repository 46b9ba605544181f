use axum::{http::StatusCode, response::IntoResponse};

/// 健康检查端点
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "服务正常", body = String)),
    tag = "health"
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
