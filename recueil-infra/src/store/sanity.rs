use async_trait::async_trait;
use recueil_api::{Condition, DocumentQuery, DocumentStore, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::groq::{CompiledQuery, GroqCompiler};

fn default_dataset() -> String {
    "production".to_string()
}

fn default_api_version() -> String {
    "2024-01-01".to_string()
}

fn default_use_cdn() -> bool {
    true
}

/// Sanity 连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanityConfig {
    #[serde(default)]
    pub project_id: String,

    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// 日期形式的 API 版本，例如 `2024-01-01`
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// 只读 token，公开数据集可以不填
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_use_cdn")]
    pub use_cdn: bool,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: default_dataset(),
            api_version: default_api_version(),
            token: None,
            use_cdn: default_use_cdn(),
        }
    }
}

impl SanityConfig {
    /// 查询接口地址
    pub fn endpoint(&self) -> String {
        let host = if self.use_cdn { "apicdn" } else { "api" };
        format!(
            "https://{}.{}.sanity.io/v{}/data/query/{}",
            self.project_id, host, self.api_version, self.dataset
        )
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

/// SanityDocumentStore 通过 HTTP 查询 Sanity 内容湖
pub struct SanityDocumentStore {
    config: SanityConfig,
    http_client: reqwest::Client,
}

impl SanityDocumentStore {
    pub fn new(config: SanityConfig) -> Result<Self, StoreError> {
        if config.project_id.is_empty() {
            return Err(StoreError::Query("Sanity project_id is not configured".to_string()));
        }
        Ok(Self {
            config,
            http_client: reqwest::Client::new(),
        })
    }

    pub fn config(&self) -> &SanityConfig {
        &self.config
    }

    /// 构建请求：查询文本放在 `query`，每个参数 JSON 编码后放在 `$pN`
    fn request(&self, compiled: &CompiledQuery) -> Result<reqwest::RequestBuilder, StoreError> {
        let mut pairs = Vec::with_capacity(compiled.params.len() + 1);
        pairs.push(("query".to_string(), compiled.query.clone()));
        for (name, value) in &compiled.params {
            pairs.push((format!("${}", name), serde_json::to_string(value)?));
        }

        let mut request = self.http_client.get(self.config.endpoint()).query(&pairs);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn execute(&self, compiled: CompiledQuery) -> Result<Value, StoreError> {
        debug!(query = %compiled.query, params = compiled.params.len(), "Sanity query");

        let response = self
            .request(&compiled)?
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Sanity returned {}: {}", status, body);
            return Err(StoreError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let response: QueryResponse = serde_json::from_slice(&bytes)?;
        Ok(response.result)
    }
}

#[async_trait]
impl DocumentStore for SanityDocumentStore {
    async fn query(&self, query: &DocumentQuery) -> Result<Vec<Value>, StoreError> {
        let compiled = GroqCompiler::new().compile_query(query)?;
        match self.execute(compiled).await? {
            Value::Null => Ok(Vec::new()),
            result => Ok(serde_json::from_value(result)?),
        }
    }

    async fn count(&self, condition: &Condition) -> Result<u64, StoreError> {
        let compiled = GroqCompiler::new().compile_count(condition)?;
        let result = self.execute(compiled).await?;
        Ok(serde_json::from_value(result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recueil_api::query::queries;

    fn config() -> SanityConfig {
        SanityConfig {
            project_id: "abc123".to_string(),
            token: Some("secret-token".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint() {
        let mut config = config();
        assert_eq!(
            config.endpoint(),
            "https://abc123.apicdn.sanity.io/v2024-01-01/data/query/production"
        );

        config.use_cdn = false;
        config.dataset = "staging".to_string();
        assert_eq!(
            config.endpoint(),
            "https://abc123.api.sanity.io/v2024-01-01/data/query/staging"
        );
    }

    #[test]
    fn test_missing_project_is_rejected() {
        let result = SanityDocumentStore::new(SanityConfig::default());
        assert!(matches!(result, Err(StoreError::Query(_))));
    }

    #[test]
    fn test_request_carries_params_separately() {
        let store = SanityDocumentStore::new(config()).unwrap();
        let compiled = GroqCompiler::new()
            .compile_count(&queries::type_is("recipe").and(queries::equal("difficulty", "ein\"fach")))
            .unwrap();

        let request = store.request(&compiled).unwrap().build().unwrap();
        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(pairs[0], ("query".to_string(), compiled.query.clone()));
        assert!(pairs.contains(&("$p0".to_string(), "\"recipe\"".to_string())));
        assert!(pairs.contains(&("$p1".to_string(), "\"ein\\\"fach\"".to_string())));
        assert_eq!(
            request.headers()["authorization"].to_str().unwrap(),
            "Bearer secret-token"
        );
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: SanityConfig = serde_json::from_str(r#"{ "project_id": "p1" }"#).unwrap();
        assert_eq!(config.dataset, "production");
        assert!(config.use_cdn);
        assert!(config.token.is_none());
    }
}
