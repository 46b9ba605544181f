pub mod categories;
pub mod filters;
pub mod health;
pub mod recipes;

pub use categories::*;
pub use filters::*;
pub use health::*;
pub use recipes::*;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::AppState;
    use axum::response::Response;
    use recueil_infra::MemoryDocumentStore;
    use recueil_service::{DefaultCategoryService, DefaultRecipeService};
    use serde_json::{json, Value};
    use std::sync::Arc;

    pub fn recipe(id: &str, difficulty: &str, published_at: &str) -> Value {
        json!({
            "_id": id,
            "_type": "recipe",
            "title": format!("Rezept {}", id),
            "slug": { "current": id },
            "description": "Lecker",
            "category": { "_type": "reference", "_ref": "cat-pasta" },
            "prepTime": 15,
            "servings": 4,
            "difficulty": difficulty,
            "publishedAt": published_at,
            "content": [
                { "_type": "textBlock", "_key": "t", "text": "Los geht's" },
                { "_type": "ingredientsBlock", "_key": "i", "ingredients": [
                    { "amount": "400", "unit": "g", "name": "Spaghetti" },
                    { "amount": "nach Geschmack", "name": "Pfeffer" }
                ]}
            ]
        })
    }

    pub fn state(documents: Vec<Value>) -> AppState {
        let mut all = vec![
            json!({ "_id": "cat-pasta", "_type": "category", "name": "Pasta" }),
            json!({ "_id": "cat-brot", "_type": "category", "name": "Brot" }),
        ];
        all.extend(documents);
        let store = Arc::new(MemoryDocumentStore::with_documents(all));
        AppState::new(
            Arc::new(DefaultRecipeService::new(store.clone())),
            Arc::new(DefaultCategoryService::new(store)),
        )
    }

    pub async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
