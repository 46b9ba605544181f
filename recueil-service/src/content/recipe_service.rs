use async_trait::async_trait;
use recueil_api::query::queries;
use recueil_api::{Condition, Direction, DocumentQuery, DocumentStore, Field, Projection};
use recueil_domain::content::constant::{RECIPES_PER_PAGE, RECIPE_TYPE};
use recueil_domain::{RecipeDetail, RecipeSummary};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::error::Result;

/// 列表排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::Newest, SortOrder::Oldest];

    /// 解析查询参数，未知值回退为 `newest`
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("oldest") => SortOrder::Oldest,
            _ => SortOrder::Newest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "Neueste zuerst",
            SortOrder::Oldest => "Älteste zuerst",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            SortOrder::Newest => Direction::Desc,
            SortOrder::Oldest => Direction::Asc,
        }
    }
}

/// 分页游标：上一页最后一条的发布时间，以及可选的 `_id` 用于区分相同时间戳
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub published_at: String,
    pub last_id: Option<String>,
}

impl Cursor {
    pub fn new(published_at: impl Into<String>, last_id: Option<String>) -> Self {
        Self {
            published_at: published_at.into(),
            last_id,
        }
    }
}

/// 列表查询条件
///
/// 所有筛选值都是不透明字符串，空白值视为未设置。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub sort: SortOrder,
    pub cursor: Option<Cursor>,
}

impl RecipeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn after(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// 去掉游标，只保留筛选条件
    pub fn without_cursor(&self) -> Self {
        Self {
            cursor: None,
            ..self.clone()
        }
    }

    /// 筛选条件：类型、搜索、分类、难度（不含游标）
    fn filter_condition(&self) -> Condition {
        let mut conditions = vec![queries::type_is(RECIPE_TYPE)];

        if let Some(term) = non_blank(&self.search) {
            conditions.push(
                queries::starts_with("title", term).or(queries::starts_with("description", term)),
            );
        }
        if let Some(category) = non_blank(&self.category) {
            conditions.push(queries::equal("category._ref", category));
        }
        if let Some(difficulty) = non_blank(&self.difficulty) {
            conditions.push(queries::equal("difficulty", difficulty));
        }

        queries::all_of(conditions)
    }

    /// 游标条件
    ///
    /// newest: `publishedAt < t`，带 `_id` 时为 `publishedAt < t || (publishedAt == t && _id < id)`；
    /// oldest 方向相反。游标原样传给文档库，两端都按时刻比较。
    fn cursor_condition(&self) -> Option<Condition> {
        let cursor = self.cursor.as_ref()?;
        let published_at = cursor.published_at.trim();
        if published_at.is_empty() {
            return None;
        }

        let beyond = |field: &str, bound: &str| match self.sort {
            SortOrder::Newest => queries::less_than(field, bound, false),
            SortOrder::Oldest => queries::greater_than(field, bound, false),
        };

        let condition = match non_blank(&cursor.last_id) {
            None => beyond("publishedAt", published_at),
            Some(last_id) => beyond("publishedAt", published_at).or(
                queries::equal("publishedAt", published_at).and(beyond("_id", last_id)),
            ),
        };
        Some(condition)
    }

    /// 完整的列表查询：条件按 类型、搜索、分类、难度、游标 的顺序组合
    fn to_document_query(&self) -> DocumentQuery {
        let mut condition = self.filter_condition();
        if let Some(cursor) = self.cursor_condition() {
            condition = condition.and(cursor);
        }

        let direction = self.sort.direction();
        DocumentQuery::new(condition)
            .order_by("publishedAt", direction)
            .order_by("_id", direction)
            .limit(RECIPES_PER_PAGE)
            .project(summary_projection())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn summary_fields() -> Vec<Field> {
    vec![
        Field::plain("_id"),
        Field::plain("title"),
        Field::plain("slug"),
        Field::plain("description"),
        Field::plain("mainImage"),
        Field::deref("category", vec![Field::plain("name"), Field::plain("slug")]),
        Field::plain("prepTime"),
        Field::plain("servings"),
        Field::plain("difficulty"),
        Field::plain("publishedAt"),
    ]
}

fn summary_projection() -> Projection {
    Projection::new(summary_fields())
}

fn detail_projection() -> Projection {
    let mut fields = summary_fields();
    fields.push(Field::plain("content"));
    fields.push(Field::plain("video"));
    Projection::new(fields)
}

/// 一页菜谱
///
/// `has_more` 是启发式判断：本页条数等于页大小即为 true，
/// 因此总数恰为 12 的倍数时最后会多请求一次空页。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipePage {
    pub recipes: Vec<RecipeSummary>,
    pub has_more: bool,
    pub last_published_at: Option<String>,
    pub last_id: Option<String>,
}

impl RecipePage {
    pub fn from_recipes(recipes: Vec<RecipeSummary>) -> Self {
        let has_more = recipes.len() == RECIPES_PER_PAGE;
        let last_published_at = recipes
            .last()
            .map(|recipe| recipe.published_at.to_string());
        let last_id = recipes.last().map(|recipe| recipe.id.clone());
        Self {
            recipes,
            has_more,
            last_published_at,
            last_id,
        }
    }

    pub fn empty() -> Self {
        Self::from_recipes(Vec::new())
    }

    /// 下一页的游标，空页返回 None
    pub fn next_cursor(&self) -> Option<Cursor> {
        self.last_published_at
            .as_ref()
            .map(|published_at| Cursor::new(published_at.clone(), self.last_id.clone()))
    }
}

/// 菜谱服务trait
#[async_trait]
pub trait RecipeService: Send + Sync {
    /// 按筛选条件与游标获取一页菜谱
    async fn list(&self, query: &RecipeQuery) -> Result<RecipePage>;

    /// 统计匹配筛选条件的菜谱数量（忽略游标与排序）
    async fn count(&self, query: &RecipeQuery) -> Result<u64>;

    /// 按 slug 获取菜谱详情，不存在或文档不合法时返回 None
    async fn get_by_slug(&self, slug: &str) -> Result<Option<RecipeDetail>>;
}

pub struct DefaultRecipeService<S: DocumentStore + ?Sized> {
    store: Arc<S>,
}

impl<S: DocumentStore + ?Sized> DefaultRecipeService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: DocumentStore + ?Sized> RecipeService for DefaultRecipeService<S> {
    async fn list(&self, query: &RecipeQuery) -> Result<RecipePage> {
        let document_query = query.to_document_query();
        let documents = self.store.query(&document_query).await?;

        let recipes = documents
            .into_iter()
            .map(serde_json::from_value::<RecipeSummary>)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(count = recipes.len(), sort = query.sort.as_str(), "Listed recipes");
        Ok(RecipePage::from_recipes(recipes))
    }

    async fn count(&self, query: &RecipeQuery) -> Result<u64> {
        let count = self.store.count(&query.filter_condition()).await?;
        Ok(count)
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<RecipeDetail>> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Ok(None);
        }

        let condition = queries::type_is(RECIPE_TYPE).and(queries::equal("slug.current", slug));
        let query = DocumentQuery::new(condition).project(detail_projection());
        let Some(document) = self.store.first(&query).await? else {
            return Ok(None);
        };

        let detail: RecipeDetail = match serde_json::from_value(document) {
            Ok(detail) => detail,
            Err(e) => {
                warn!("Recipe {} could not be decoded: {}", slug, e);
                return Ok(None);
            }
        };
        if let Err(e) = detail.check() {
            warn!("Recipe {} failed validation: {}", slug, e);
            return Ok(None);
        }

        Ok(Some(detail))
    }
}
