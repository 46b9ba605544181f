use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recueil_service::ContentError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// 错误响应体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// HTTP 层错误
///
/// 上游失败只返回固定的提示，具体原因写入日志。
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    Internal {
        message: &'static str,
        #[source]
        source: ContentError,
    },
}

impl ApiError {
    /// 用于 `map_err`：把服务错误包装为带固定提示的 500
    pub fn internal(message: &'static str) -> impl FnOnce(ContentError) -> Self {
        move |source| ApiError::Internal { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { message, source } = &self {
            error!("{}: {}", message, source);
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recueil_api::StoreError;

    #[test]
    fn test_internal_error_hides_cause() {
        let err = ApiError::internal("Failed to fetch recipes")(ContentError::Fetch(
            StoreError::Transport("connection reset".to_string()),
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to fetch recipes");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    }
}
