//! Embedding provider port for semantic vector generation.
//!
//! Defines the trait for embedding providers that convert text into
//! dense vector representations for semantic similarity search.

use async_trait::async_trait;

use crate::domain::errors::{AgentError, AgentResult};

/// A single embedding request item.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    /// Unique client-side ID for correlation.
    pub id: String,
    /// Text to embed.
    pub text: String,
}

/// A single embedding result. Batch failures are reported per item.
#[derive(Debug)]
pub struct EmbeddingOutput {
    /// Correlation ID matching the input.
    pub id: String,
    /// The embedding vector, or the failure for this item.
    pub result: Result<Vec<f32>, AgentError>,
}

/// Trait for embedding providers (single and batch).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "openai", "hash").
    fn name(&self) -> &'static str;

    /// Embedding dimension for this provider/model.
    fn dimension(&self) -> usize;

    /// Generate an embedding for a single text.
    ///
    /// Empty or oversized input is rejected with `AgentError::Embedding`.
    async fn embed(&self, text: &str) -> AgentResult<Vec<f32>>;

    /// Generate embeddings for multiple texts.
    ///
    /// Implementations should handle chunking if the provider has
    /// per-request limits. One bad item must not sink the batch.
    async fn embed_batch(&self, inputs: &[EmbeddingInput]) -> Vec<EmbeddingOutput>;

    /// Maximum number of texts per single API call.
    fn max_batch_size(&self) -> usize;
}
