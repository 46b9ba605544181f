use anyhow::Context;
use axum::{routing::get, Router};
use recueil_api::DocumentStore;
use recueil_infra::{MemoryDocumentStore, SanityDocumentStore};
use recueil_service::{
    CachedCategoryService, CategoryService, DefaultCategoryService, DefaultRecipeService,
    RecipeService,
};
use recueil_web::AppState;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::{Config, StoreBackend};

/// 创建应用路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(recueil_web::health_check))
        .route("/api/openapi.json", get(recueil_web::openapi_json))
        // 菜谱
        .route("/api/recipes", get(recueil_web::list_recipes))
        .route("/api/recipes/count", get(recueil_web::count_recipes))
        .route("/api/recipes/:slug", get(recueil_web::get_recipe))
        .route("/api/recipes/:slug/portions", get(recueil_web::get_recipe_portions))
        // 分类与筛选项
        .route("/api/categories", get(recueil_web::list_categories))
        .route("/api/filters", get(recueil_web::get_filters))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

/// 按配置选择文档库
async fn init_store(config: &Config) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            let store = match &config.store.seed_file {
                Some(path) => MemoryDocumentStore::from_json_file(path)
                    .await
                    .with_context(|| format!("Failed to load seed file {}", path.display()))?,
                None => {
                    warn!("No seed file configured, starting with an empty memory store");
                    MemoryDocumentStore::new()
                }
            };
            Ok(Arc::new(store))
        }
        StoreBackend::Sanity => {
            let store = SanityDocumentStore::new(config.sanity.clone())
                .context("Failed to configure Sanity client")?;
            info!("Using Sanity dataset {} ({})", config.sanity.dataset, config.sanity.endpoint());
            Ok(Arc::new(store))
        }
    }
}

/// 初始化应用状态
pub async fn init_app_state(config: &Config) -> anyhow::Result<AppState> {
    let store = init_store(config).await?;

    // 创建Recipe服务
    let recipe_service: Arc<dyn RecipeService> = Arc::new(DefaultRecipeService::new(store.clone()));

    // 创建Category服务（带缓存）
    let category_service: Arc<dyn CategoryService> = Arc::new(DefaultCategoryService::new(store));
    let category_service: Arc<dyn CategoryService> = Arc::new(CachedCategoryService::new(
        category_service,
        Duration::from_secs(config.cache.category_ttl_secs),
    ));

    Ok(AppState::new(recipe_service, category_service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use recueil_api::{Condition, DocumentQuery, StoreError};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn seed() -> Vec<Value> {
        let mut documents = vec![json!({ "_id": "cat-suppe", "_type": "category", "name": "Suppen" })];
        for n in 1..=14 {
            documents.push(json!({
                "_id": format!("r{:02}", n),
                "_type": "recipe",
                "title": format!("Suppe Nr. {}", n),
                "description": "Warm und würzig",
                "category": { "_type": "reference", "_ref": "cat-suppe" },
                "prepTime": 30,
                "servings": 2,
                "difficulty": if n <= 10 { "einfach" } else { "professionell" },
                "publishedAt": format!("2024-04-{:02}T18:00:00.000Z", n),
                "content": [
                    { "_type": "ingredientsBlock", "_key": "z", "ingredients": [
                        { "amount": "1", "unit": "l", "name": "Brühe" }
                    ]}
                ]
            }));
        }
        documents
    }

    fn app_with_store(store: Arc<dyn DocumentStore>) -> Router {
        let state = AppState::new(
            Arc::new(DefaultRecipeService::new(store.clone())),
            Arc::new(DefaultCategoryService::new(store)),
        );
        create_router(state)
    }

    fn app() -> Router {
        app_with_store(Arc::new(MemoryDocumentStore::with_documents(seed())))
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = get(app(), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_recipes_endpoint_with_filters() {
        let response = get(app(), "/api/recipes?difficulty=einfach&sort=oldest").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["recipes"].as_array().unwrap().len(), 10);
        assert_eq!(body["recipes"][0]["_id"], "r01");
        assert_eq!(body["hasMore"], false);
        assert_eq!(body["lastId"], "r10");
    }

    #[tokio::test]
    async fn test_recipes_cursor_round_trip() {
        let first = body_json(get(app(), "/api/recipes").await).await;
        assert_eq!(first["hasMore"], true);

        let uri = format!(
            "/api/recipes?lastPublishedAt={}&lastId={}",
            first["lastPublishedAt"].as_str().unwrap(),
            first["lastId"].as_str().unwrap()
        );
        let second = body_json(get(app(), &uri).await).await;
        let ids: Vec<&str> = second["recipes"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|r| r["_id"].as_str())
            .collect();
        assert_eq!(ids, vec!["r02", "r01"]);
    }

    #[tokio::test]
    async fn test_count_route_is_not_a_slug() {
        let body = body_json(get(app(), "/api/recipes/count?search=suppe").await).await;
        assert_eq!(body["count"], 14);
    }

    #[tokio::test]
    async fn test_recipe_detail_and_portions() {
        let response = get(app(), "/api/recipes/suppe-nr-3").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["_id"], "r03");

        let portions = body_json(get(app(), "/api/recipes/suppe-nr-3/portions?servings=3").await).await;
        assert_eq!(portions["blocks"][0]["ingredients"][0]["display"], "1.5 l Brühe");
        assert_eq!(portions["servingsLabel"], "Portionen");

        let missing = get(app(), "/api/recipes/gibt-es-nicht").await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(missing).await, json!({ "error": "Recipe not found" }));
    }

    #[tokio::test]
    async fn test_malformed_query_is_json_bad_request() {
        for uri in [
            "/api/recipes/suppe-nr-3/portions?servings=abc",
            "/api/recipes/suppe-nr-3/portions?servings=-1",
        ] {
            let response = get(app(), uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = body_json(response).await;
            assert!(body["error"]
                .as_str()
                .unwrap()
                .starts_with("Failed to deserialize query string"));
        }

        let zero = get(app(), "/api/recipes/suppe-nr-3/portions?servings=0").await;
        assert_eq!(zero.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(zero).await, json!({ "error": "servings must be at least 1" }));
    }

    #[tokio::test]
    async fn test_categories_and_filters() {
        let categories = body_json(get(app(), "/api/categories").await).await;
        assert_eq!(categories[0]["name"], "Suppen");

        let filters = body_json(get(app(), "/api/filters").await).await;
        assert_eq!(filters["sorts"][0]["value"], "newest");
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let response = get(app(), "/api/openapi.json").await;
        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;
        assert!(doc["paths"]["/api/recipes"].is_object());
    }

    struct UnavailableStore;

    #[async_trait]
    impl DocumentStore for UnavailableStore {
        async fn query(&self, _query: &DocumentQuery) -> Result<Vec<Value>, StoreError> {
            Err(StoreError::Transport("connection refused".to_string()))
        }

        async fn count(&self, _condition: &Condition) -> Result<u64, StoreError> {
            Err(StoreError::Transport("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_upstream_failure_messages() {
        let cases = [
            ("/api/recipes", "Failed to fetch recipes"),
            ("/api/recipes/count", "Failed to fetch recipe count"),
            ("/api/recipes/any-slug", "Failed to fetch recipe"),
            ("/api/categories", "Failed to fetch categories"),
        ];
        for (uri, message) in cases {
            let response = get(app_with_store(Arc::new(UnavailableStore)), uri).await;
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body_json(response).await, json!({ "error": message }));
        }
    }

    #[tokio::test]
    async fn test_init_app_state_with_empty_memory_store() {
        let state = init_app_state(&Config::default()).await.unwrap();
        let page = state
            .recipe_service
            .list(&recueil_service::RecipeQuery::new())
            .await
            .unwrap();
        assert!(page.recipes.is_empty());
    }

    #[tokio::test]
    async fn test_init_app_state_rejects_unconfigured_sanity() {
        let mut config = Config::default();
        config.store.backend = StoreBackend::Sanity;
        assert!(init_app_state(&config).await.is_err());
    }
}
