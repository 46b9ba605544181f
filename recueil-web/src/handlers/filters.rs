use axum::Json;
use recueil_domain::content::constant::UNIT_VOCABULARY;
use recueil_domain::Difficulty;
use recueil_service::SortOrder;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 下拉选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// 筛选与排序选项
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FiltersResponse {
    pub difficulties: Vec<FilterOption>,
    pub sorts: Vec<FilterOption>,
    pub units: Vec<String>,
}

/// 获取筛选选项
/// GET /api/filters
#[utoipa::path(
    get,
    path = "/api/filters",
    responses((status = 200, description = "筛选选项", body = FiltersResponse)),
    tag = "recipes"
)]
pub async fn get_filters() -> Json<FiltersResponse> {
    // 空值表示不限难度
    let mut difficulties = vec![FilterOption::new("", "Alle Schwierigkeiten")];
    difficulties.extend(
        Difficulty::ALL
            .iter()
            .map(|difficulty| FilterOption::new(difficulty.as_str(), difficulty.label())),
    );

    let sorts = SortOrder::ALL
        .iter()
        .map(|sort| FilterOption::new(sort.as_str(), sort.label()))
        .collect();

    Json(FiltersResponse {
        difficulties,
        sorts,
        units: UNIT_VOCABULARY.iter().map(|unit| unit.to_string()).collect(),
    })
}
