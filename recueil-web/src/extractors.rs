use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// 查询参数提取器
/// 解析失败时返回 400 和 JSON 错误体，而不是 axum 默认的纯文本
pub struct ApiQuery<T>(pub T);

#[async_trait::async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(ApiQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Params {
        servings: Option<u32>,
    }

    async fn extract(uri: &str) -> Result<ApiQuery<Params>, ApiError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        ApiQuery::<Params>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_valid_query() {
        let ApiQuery(params) = extract("/x?servings=3").await.unwrap();
        assert_eq!(params.servings, Some(3));

        let ApiQuery(params) = extract("/x").await.unwrap();
        assert_eq!(params.servings, None);
    }

    #[tokio::test]
    async fn test_invalid_query_is_bad_request() {
        let err = extract("/x?servings=abc").await.err().unwrap();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(err, ApiError::BadRequest(message) if message.starts_with("Failed to deserialize query string")));
    }
}
