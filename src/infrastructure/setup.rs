//! Runtime assembly.
//!
//! Builds the wired application from a validated [`Config`]: store,
//! embedder, retriever, tool client, provider chain, agent roster, and
//! the router on top. The CLI owns process concerns (logging, exit
//! codes); everything below that line is constructed here.

use std::sync::Arc;

use crate::adapters::embeddings::{HashEmbedder, OpenAiEmbedder, OpenAiEmbedderConfig};
use crate::adapters::providers::build_provider;
use crate::adapters::store::SqliteVectorStore;
use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::{Config, EmbeddingConfig, GenerationParams};
use crate::domain::ports::{EmbeddingProvider, LlmProvider};
use crate::services::agents::{build_agents, AgentRuntime};
use crate::services::retriever::Retriever;
use crate::services::router::Router;
use crate::services::tool_client::ToolClient;

/// The assembled application.
pub struct App {
    pub config: Config,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub store: Arc<SqliteVectorStore>,
    pub tools: Arc<ToolClient>,
    pub providers: Vec<Arc<dyn LlmProvider>>,
    pub router: Router,
}

impl App {
    /// Wire every component from config.
    ///
    /// Fails fast on anything unusable at startup (bad store path,
    /// missing provider credentials) instead of at first request.
    pub async fn bootstrap(config: Config) -> AgentResult<Self> {
        let store = Arc::new(
            SqliteVectorStore::connect(&config.store.path, config.store.max_connections).await?,
        );
        let embedder = build_embedder(&config.embedding)?;
        let retriever = Arc::new(Retriever::new(
            embedder.clone(),
            store.clone(),
            config.retrieval.clone(),
        ));
        let tools = Arc::new(ToolClient::from_config(&config.tools)?);

        let providers: Vec<Arc<dyn LlmProvider>> = config
            .providers
            .iter()
            .map(build_provider)
            .collect::<AgentResult<_>>()?;
        if providers.is_empty() {
            tracing::warn!("no providers configured; every ask will fail with exhaustion");
        }

        let params = GenerationParams {
            model: None,
            max_tokens: config.generation.max_tokens,
            temperature: config.generation.temperature,
        };
        let runtime = Arc::new(AgentRuntime::new(
            retriever,
            tools.clone(),
            providers.clone(),
            params,
        ));
        let agents = build_agents(&runtime);
        let router = Router::new(agents, &config.router, config.request_deadline_ms);

        tracing::info!(
            store = %config.store.path,
            embedder = embedder.name(),
            providers = providers.len(),
            tools = ?tools.tool_names(),
            "runtime assembled"
        );

        Ok(Self {
            config,
            embedder,
            store,
            tools,
            providers,
            router,
        })
    }
}

/// Pick the embedding backend by config kind.
pub fn build_embedder(config: &EmbeddingConfig) -> AgentResult<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiEmbedder::new(OpenAiEmbedderConfig::from(
            config,
        ))?)),
        "hash" => Ok(Arc::new(HashEmbedder::new(
            config.dimension,
            config.max_input_chars,
        ))),
        other => Err(AgentError::Config(format!(
            "unknown embedding provider: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_hash_embedder() {
        let config = EmbeddingConfig {
            provider: "hash".to_string(),
            dimension: 64,
            ..EmbeddingConfig::default()
        };
        let embedder = build_embedder(&config).unwrap();
        assert_eq!(embedder.name(), "hash");
        assert_eq!(embedder.dimension(), 64);
    }

    #[test]
    fn test_unknown_embedder_rejected() {
        let config = EmbeddingConfig {
            provider: "word2vec".to_string(),
            ..EmbeddingConfig::default()
        };
        assert!(matches!(
            build_embedder(&config),
            Err(AgentError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_with_mock_stack() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.store.path = dir
            .path()
            .join("counsel.db")
            .to_string_lossy()
            .into_owned();
        config.embedding.provider = "hash".to_string();
        config.embedding.dimension = 16;
        config.providers.push(crate::domain::models::ProviderConfig {
            name: "mock".to_string(),
            kind: "mock".to_string(),
            api_key: None,
            base_url: None,
            model: "mock".to_string(),
            timeout_secs: 5,
        });

        let app = App::bootstrap(config).await.unwrap();
        assert_eq!(app.providers.len(), 1);
        assert_eq!(app.embedder.name(), "hash");
        // content_extract needs no configuration, so it is always present.
        assert!(app.tools.has("content_extract"));
    }
}
