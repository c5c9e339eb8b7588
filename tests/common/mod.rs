//! Shared fixtures for integration tests.
//!
//! Assembles the full pipeline offline: hash embedder, in-memory vector
//! store, scripted mock providers, and an empty tool client. No network
//! access anywhere.

use std::sync::Arc;

use counsel::adapters::embeddings::HashEmbedder;
use counsel::adapters::providers::{MockBehavior, MockProvider};
use counsel::adapters::store::SqliteVectorStore;
use counsel::domain::models::{GenerationParams, RetrievalConfig, RetryConfig, RouterConfig};
use counsel::domain::ports::{EmbeddingProvider, LlmProvider, VectorStore};
use counsel::services::agents::build_agents;
use counsel::services::{AgentRuntime, RetryPolicy};
use counsel::{Chunk, Retriever, Router, ToolClient};

/// Dimension shared by the seeded store and the query-time embedder.
pub const DIMENSION: usize = 32;

/// Deadline generous enough for the in-process pipeline, short enough to
/// fail fast if something hangs.
pub const DEADLINE_MS: u64 = 5_000;

pub fn embedder() -> Arc<HashEmbedder> {
    Arc::new(HashEmbedder::new(DIMENSION, 8192))
}

/// Seed an in-memory store with `(id, text, source_id, collection)` rows,
/// embedding each text with the shared hash embedder.
#[allow(dead_code)]
pub async fn seeded_store(rows: &[(&str, &str, &str, &str)]) -> Arc<SqliteVectorStore> {
    let store = SqliteVectorStore::in_memory()
        .await
        .expect("in-memory store");
    let embedder = embedder();
    for (id, text, source_id, collection) in rows {
        let vector = embedder.embed(text).await.expect("embed seed row");
        let chunk = Chunk::new(*id, *text, *source_id, *collection);
        store.upsert(&chunk, &vector).await.expect("upsert seed row");
    }
    Arc::new(store)
}

/// Assemble a router over the given store and provider chain.
///
/// The similarity floor is zero: hash-embedder scores depend on token
/// overlap, and the tests only care that seeded rows rank above absent
/// ones, not about absolute score values.
#[allow(dead_code)]
pub fn build_router(store: Arc<SqliteVectorStore>, providers: Vec<Arc<dyn LlmProvider>>) -> Router {
    let retriever = Retriever::new(
        embedder(),
        store,
        RetrievalConfig {
            top_k: 5,
            min_score: 0.0,
        },
    );
    let tools = ToolClient::new(RetryPolicy::from(&RetryConfig::default()));
    let runtime = Arc::new(AgentRuntime::new(
        Arc::new(retriever),
        Arc::new(tools),
        providers,
        GenerationParams::default(),
    ));
    Router::new(build_agents(&runtime), &RouterConfig::default(), DEADLINE_MS)
}

#[allow(dead_code)]
pub fn succeeding_provider(name: &str, text: &str) -> Arc<dyn LlmProvider> {
    Arc::new(MockProvider::succeeding(name, text))
}

#[allow(dead_code)]
pub fn transient_provider(name: &str, reason: &str) -> Arc<dyn LlmProvider> {
    Arc::new(MockProvider::new(
        name,
        vec![MockBehavior::Transient(reason.to_string())],
    ))
}

#[allow(dead_code)]
pub fn scripted_provider(name: &str, script: Vec<MockBehavior>) -> Arc<dyn LlmProvider> {
    Arc::new(MockProvider::new(name, script))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_store_registers_collections() {
        let store = seeded_store(&[
            ("p-1", "privacy policy text", "handbook", "policy_documents"),
            ("c-1", "rival pricing table", "notes", "competitor_profiles"),
        ])
        .await;

        let collections = store.collections().await.expect("list collections");
        assert!(collections.contains(&"policy_documents".to_string()));
        assert!(collections.contains(&"competitor_profiles".to_string()));
    }

    #[tokio::test]
    async fn test_seeded_rows_are_queryable() {
        let store = seeded_store(&[(
            "p-1",
            "data retention rules for customer records",
            "handbook",
            "policy_documents",
        )])
        .await;

        let query = embedder()
            .embed("data retention rules")
            .await
            .expect("embed query");
        let hits = store
            .query("policy_documents", &query, 5, 0.0)
            .await
            .expect("query seeded store");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0.id, "p-1");
    }
}
