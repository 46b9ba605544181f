use async_trait::async_trait;
use moka::future::Cache;
use recueil_api::query::queries;
use recueil_api::{Direction, DocumentQuery, DocumentStore, Field, Projection};
use recueil_domain::content::constant::CATEGORY_TYPE;
use recueil_domain::Category;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::Result;

/// Category服务trait
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// 按名称升序返回全部分类
    async fn list(&self) -> Result<Vec<Category>>;
}

pub struct DefaultCategoryService<S: DocumentStore + ?Sized> {
    store: Arc<S>,
}

impl<S: DocumentStore + ?Sized> DefaultCategoryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: DocumentStore + ?Sized> CategoryService for DefaultCategoryService<S> {
    async fn list(&self) -> Result<Vec<Category>> {
        let query = DocumentQuery::new(queries::type_is(CATEGORY_TYPE))
            .order_by("name", Direction::Asc)
            .project(Projection::new(vec![
                Field::plain("_id"),
                Field::plain("name"),
                Field::plain("slug"),
            ]));

        let documents = self.store.query(&query).await?;
        let categories = documents
            .into_iter()
            .map(serde_json::from_value::<Category>)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }
}

const CACHE_KEY: &str = "categories";

/// 带缓存的分类服务包装器
///
/// 分类很少变化，整张列表按 TTL 缓存；查询失败不会写入缓存。
pub struct CachedCategoryService {
    inner: Arc<dyn CategoryService>,
    cache: Cache<&'static str, Arc<Vec<Category>>>,
}

impl CachedCategoryService {
    pub fn new(inner: Arc<dyn CategoryService>, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(ttl)
            .build();
        Self { inner, cache }
    }
}

#[async_trait]
impl CategoryService for CachedCategoryService {
    async fn list(&self) -> Result<Vec<Category>> {
        if let Some(categories) = self.cache.get(CACHE_KEY).await {
            debug!("Category cache hit");
            return Ok(categories.as_ref().clone());
        }

        let categories = self.inner.list().await?;
        self.cache
            .insert(CACHE_KEY, Arc::new(categories.clone()))
            .await;
        Ok(categories)
    }
}
