//! Vector store port for similarity search over indexed chunks.

use async_trait::async_trait;

use crate::domain::errors::AgentResult;
use crate::domain::models::Chunk;

/// Trait for vector store backends.
///
/// Reads must be safe under arbitrary concurrency. Writes happen only on
/// the operator ingest path, never while serving requests.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store name (e.g., "sqlite").
    fn name(&self) -> &'static str;

    /// Names of all known collections.
    async fn collections(&self) -> AgentResult<Vec<String>>;

    /// Fixed embedding dimension of a collection.
    ///
    /// Errors with `CollectionNotFound` for unknown collections.
    async fn collection_dimension(&self, collection: &str) -> AgentResult<usize>;

    /// Nearest chunks to `vector` by cosine similarity.
    ///
    /// Returns at most `top_k` results with `score >= min_score`, sorted
    /// descending by score with stable ties. A query vector whose length
    /// differs from the collection's dimension fails fast with
    /// `DimensionMismatch` before any scan.
    async fn query(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
        min_score: f32,
    ) -> AgentResult<Vec<(Chunk, f32)>>;

    /// Insert or replace a chunk and its embedding.
    ///
    /// The embedding must match the collection's dimension; the collection
    /// is created with that dimension on first upsert.
    async fn upsert(&self, chunk: &Chunk, vector: &[f32]) -> AgentResult<()>;
}
