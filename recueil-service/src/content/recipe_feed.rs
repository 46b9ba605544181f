//! "加载更多"的状态机
//!
//! 同一列表同时最多只有一个加载请求；筛选条件变化或离开页面时
//! 递增代数，之后返回的旧结果会被丢弃，不会合并到新列表里。

use recueil_domain::RecipeSummary;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::recipe_service::{Cursor, RecipePage, RecipeQuery, RecipeService};
use crate::error::Result;

/// 一次加载请求的凭证
#[derive(Debug, Clone, PartialEq)]
pub struct LoadTicket {
    generation: u64,
    query: RecipeQuery,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 带游标的下一页查询
    pub fn query(&self) -> &RecipeQuery {
        &self.query
    }
}

/// 合并结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedUpdate {
    /// 追加了若干条
    Appended(usize),
    /// 空页，没有更多了
    Exhausted,
    /// 凭证已过期，结果被丢弃
    Stale,
    /// 请求失败，状态保持不变
    Failed,
}

#[derive(Debug)]
pub struct RecipeFeed {
    query: RecipeQuery,
    recipes: Vec<RecipeSummary>,
    has_more: bool,
    cursor: Option<Cursor>,
    loading: bool,
    generation: u64,
}

impl RecipeFeed {
    pub fn new(query: RecipeQuery, first_page: RecipePage) -> Self {
        let mut feed = Self {
            query: RecipeQuery::default(),
            recipes: Vec::new(),
            has_more: false,
            cursor: None,
            loading: false,
            generation: 0,
        };
        feed.load_first_page(query, first_page);
        feed
    }

    fn load_first_page(&mut self, query: RecipeQuery, first_page: RecipePage) {
        self.query = query.without_cursor();
        self.cursor = first_page.next_cursor();
        self.has_more = first_page.has_more;
        self.recipes = first_page.recipes;
        self.loading = false;
    }

    pub fn recipes(&self) -> &[RecipeSummary] {
        &self.recipes
    }

    pub fn query(&self) -> &RecipeQuery {
        &self.query
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 开始加载下一页
    ///
    /// 只有在还有更多、存在游标且没有进行中的请求时才返回凭证。
    pub fn begin_load_more(&mut self) -> Option<LoadTicket> {
        if !self.has_more || self.loading {
            return None;
        }
        let cursor = self.cursor.clone()?;

        self.loading = true;
        Some(LoadTicket {
            generation: self.generation,
            query: self.query.clone().after(cursor),
        })
    }

    /// 合并加载结果
    pub fn complete(&mut self, ticket: LoadTicket, result: Result<RecipePage>) -> FeedUpdate {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Dropping stale page"
            );
            return FeedUpdate::Stale;
        }
        self.loading = false;

        match result {
            Err(e) => {
                warn!("Error loading more recipes: {}", e);
                FeedUpdate::Failed
            }
            Ok(page) if page.recipes.is_empty() => {
                self.has_more = false;
                FeedUpdate::Exhausted
            }
            Ok(page) => {
                let appended = page.recipes.len();
                self.cursor = page.next_cursor();
                self.has_more = page.has_more;
                self.recipes.extend(page.recipes);
                FeedUpdate::Appended(appended)
            }
        }
    }

    /// 筛选条件变化或重新进入页面，进行中的请求全部作废
    pub fn reset(&mut self, query: RecipeQuery, first_page: RecipePage) {
        self.generation += 1;
        self.load_first_page(query, first_page);
    }
}

/// 执行一次加载：取凭证、释放锁后请求、再加锁合并
///
/// 没有可加载的内容或已有请求在进行时返回 None。
pub async fn load_more(feed: &Mutex<RecipeFeed>, service: &dyn RecipeService) -> Option<FeedUpdate> {
    let ticket = feed.lock().await.begin_load_more()?;
    let result = service.list(ticket.query()).await;
    Some(feed.lock().await.complete(ticket, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::DefaultRecipeService;
    use crate::error::ContentError;
    use recueil_api::StoreError;
    use recueil_infra::MemoryDocumentStore;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn recipe(n: usize) -> Value {
        json!({
            "_id": format!("r{:02}", n),
            "_type": "recipe",
            "title": format!("Rezept {}", n),
            "description": "Lecker",
            "prepTime": 10,
            "servings": 2,
            "difficulty": if n % 2 == 0 { "einfach" } else { "fortgeschritten" },
            "publishedAt": format!("2024-02-01T12:{:02}:00.000Z", n)
        })
    }

    fn service(count: usize) -> DefaultRecipeService<MemoryDocumentStore> {
        let store = MemoryDocumentStore::with_documents((1..=count).map(recipe));
        DefaultRecipeService::new(Arc::new(store))
    }

    async fn feed_for(service: &DefaultRecipeService<MemoryDocumentStore>, query: RecipeQuery) -> RecipeFeed {
        let first = service.list(&query).await.unwrap();
        RecipeFeed::new(query, first)
    }

    #[tokio::test]
    async fn test_load_more_until_exhausted() {
        let service = service(26);
        let feed = Mutex::new(feed_for(&service, RecipeQuery::new()).await);

        assert_eq!(load_more(&feed, &service).await, Some(FeedUpdate::Appended(12)));
        assert_eq!(load_more(&feed, &service).await, Some(FeedUpdate::Appended(2)));
        assert_eq!(load_more(&feed, &service).await, None);

        let feed = feed.lock().await;
        assert_eq!(feed.recipes().len(), 26);
        assert!(!feed.has_more());
        assert_eq!(feed.recipes()[25].id, "r01");
    }

    #[tokio::test]
    async fn test_only_one_request_in_flight() {
        let service = service(30);
        let mut feed = feed_for(&service, RecipeQuery::new()).await;

        let ticket = feed.begin_load_more().unwrap();
        assert!(feed.is_loading());
        assert!(feed.begin_load_more().is_none());

        let page = service.list(ticket.query()).await;
        assert_eq!(feed.complete(ticket, page), FeedUpdate::Appended(12));
        assert!(feed.begin_load_more().is_some());
    }

    #[tokio::test]
    async fn test_stale_result_is_dropped_after_reset() {
        let service = service(30);
        let mut feed = feed_for(&service, RecipeQuery::new()).await;

        let ticket = feed.begin_load_more().unwrap();
        let stale_page = service.list(ticket.query()).await;

        let filtered = RecipeQuery::new().difficulty("einfach");
        let first = service.list(&filtered).await.unwrap();
        feed.reset(filtered, first);
        let before = feed.recipes().to_vec();

        assert_eq!(feed.complete(ticket, stale_page), FeedUpdate::Stale);
        assert_eq!(feed.recipes(), before.as_slice());
        assert!(feed.recipes().iter().all(|r| r.difficulty.as_str() == "einfach"));
        assert_eq!(feed.generation(), 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_state() {
        let service = service(13);
        let mut feed = feed_for(&service, RecipeQuery::new()).await;

        let ticket = feed.begin_load_more().unwrap();
        let failed = Err(ContentError::Fetch(StoreError::Transport("timeout".to_string())));
        assert_eq!(feed.complete(ticket, failed), FeedUpdate::Failed);

        assert!(!feed.is_loading());
        assert!(feed.has_more());
        assert_eq!(feed.recipes().len(), 12);
        assert!(feed.begin_load_more().is_some());
    }

    #[tokio::test]
    async fn test_empty_page_ends_feed() {
        let service = service(12);
        let mut feed = feed_for(&service, RecipeQuery::new()).await;
        assert!(feed.has_more());

        let ticket = feed.begin_load_more().unwrap();
        let page = service.list(ticket.query()).await;
        assert_eq!(feed.complete(ticket, page), FeedUpdate::Exhausted);
        assert!(!feed.has_more());
        assert!(feed.begin_load_more().is_none());
    }
}
