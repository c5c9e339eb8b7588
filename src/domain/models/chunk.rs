//! Knowledge-base chunk and retrieval result models.

use serde::{Deserialize, Serialize};

/// An indexed fragment of a knowledge-base document.
///
/// Chunks are immutable once indexed; the retrieval path never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk identifier.
    pub id: String,
    /// Chunk text as indexed.
    pub text: String,
    /// Identifier of the source document the chunk was cut from.
    pub source_id: String,
    /// Collection the chunk belongs to.
    pub collection: String,
}

impl Chunk {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        source_id: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source_id: source_id.into(),
            collection: collection.into(),
        }
    }
}

/// A chunk scored against a query. Ephemeral, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub chunk: Chunk,
    /// Cosine similarity in `[-1.0, 1.0]`, higher is more similar.
    pub score: f32,
}

impl RetrievalResult {
    pub fn new(chunk: Chunk, score: f32) -> Self {
        Self { chunk, score }
    }
}
