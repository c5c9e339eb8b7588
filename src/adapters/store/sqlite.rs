//! SQLite vector store adapter.
//!
//! Stores chunk embeddings as little-endian f32 BLOBs and scores candidates
//! with a pure-Rust cosine similarity over the collection's rows. Every
//! collection carries a fixed dimension; mismatched vectors are rejected
//! before any scan.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::Chunk;
use crate::domain::ports::VectorStore;

pub struct SqliteVectorStore {
    pool: Arc<SqlitePool>,
}

impl SqliteVectorStore {
    /// Open (or create) the store at `path`.
    pub async fn connect(path: &str, max_connections: u32) -> AgentResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        let store = Self {
            pool: Arc::new(pool),
        };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// In-memory store. A single connection keeps all reads on one database.
    pub async fn in_memory() -> AgentResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self {
            pool: Arc::new(pool),
        };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> AgentResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS collections (
                name TEXT PRIMARY KEY,
                dimension INTEGER NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chunks (
                id TEXT NOT NULL,
                collection TEXT NOT NULL,
                source_id TEXT NOT NULL,
                text TEXT NOT NULL,
                embedding BLOB NOT NULL,
                PRIMARY KEY (id, collection)
            )
            "#,
        )
        .execute(&*self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_chunks_collection ON chunks(collection)")
            .execute(&*self.pool)
            .await?;

        Ok(())
    }

    /// Serialize embedding vector to bytes for storage
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding vector from bytes
    fn bytes_to_embedding(bytes: &[u8]) -> AgentResult<Vec<f32>> {
        if bytes.len() % 4 != 0 {
            return Err(AgentError::Store(
                "Invalid embedding bytes length".to_string(),
            ));
        }

        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }

    /// Cosine similarity in `[-1, 1]`. Mismatched lengths and zero-magnitude
    /// vectors score `f32::MIN` so they can never pass a similarity floor.
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return f32::MIN;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if mag_a == 0.0 || mag_b == 0.0 {
            return f32::MIN;
        }

        dot / (mag_a * mag_b)
    }

    async fn dimension_of(&self, collection: &str) -> AgentResult<Option<usize>> {
        let row = sqlx::query("SELECT dimension FROM collections WHERE name = ?")
            .bind(collection)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.map(|r| {
            let dim: i64 = r.get("dimension");
            dim as usize
        }))
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn collections(&self) -> AgentResult<Vec<String>> {
        let rows = sqlx::query("SELECT name FROM collections ORDER BY name")
            .fetch_all(&*self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.get("name")).collect())
    }

    async fn collection_dimension(&self, collection: &str) -> AgentResult<usize> {
        self.dimension_of(collection)
            .await?
            .ok_or_else(|| AgentError::CollectionNotFound(collection.to_string()))
    }

    async fn query(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
        min_score: f32,
    ) -> AgentResult<Vec<(Chunk, f32)>> {
        let expected = self.collection_dimension(collection).await?;
        if vector.len() != expected {
            return Err(AgentError::DimensionMismatch {
                collection: collection.to_string(),
                expected,
                got: vector.len(),
            });
        }

        let rows = sqlx::query(
            "SELECT id, collection, source_id, text, embedding FROM chunks WHERE collection = ? ORDER BY id",
        )
        .bind(collection)
        .fetch_all(&*self.pool)
        .await?;

        let mut scored = Vec::new();
        for row in rows {
            let embedding_bytes: Vec<u8> = row.get("embedding");
            let embedding = Self::bytes_to_embedding(&embedding_bytes)?;
            let score = Self::cosine_similarity(vector, &embedding);
            if score >= min_score {
                let chunk = Chunk {
                    id: row.get("id"),
                    text: row.get("text"),
                    source_id: row.get("source_id"),
                    collection: row.get("collection"),
                };
                scored.push((chunk, score));
            }
        }

        // Stable sort keeps id order among equal scores.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);

        Ok(scored)
    }

    async fn upsert(&self, chunk: &Chunk, vector: &[f32]) -> AgentResult<()> {
        match self.dimension_of(&chunk.collection).await? {
            Some(expected) if expected != vector.len() => {
                return Err(AgentError::DimensionMismatch {
                    collection: chunk.collection.clone(),
                    expected,
                    got: vector.len(),
                });
            }
            Some(_) => {}
            None => {
                sqlx::query("INSERT INTO collections (name, dimension) VALUES (?, ?)")
                    .bind(&chunk.collection)
                    .bind(vector.len() as i64)
                    .execute(&*self.pool)
                    .await?;
            }
        }

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO chunks (id, collection, source_id, text, embedding)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&chunk.id)
        .bind(&chunk.collection)
        .bind(&chunk.source_id)
        .bind(&chunk.text)
        .bind(Self::embedding_to_bytes(vector))
        .execute(&*self.pool)
        .await?;

        Ok(())
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for generating normalized embeddings (L2 norm = 1.0)
    fn normalized_embedding_strategy(dim: usize) -> impl Strategy<Value = Vec<f32>> {
        prop::collection::vec(-1.0f32..1.0f32, dim..=dim).prop_map(|mut vec| {
            let magnitude: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
            if magnitude > 0.0 {
                for val in &mut vec {
                    *val /= magnitude;
                }
            }
            vec
        })
    }

    proptest! {
        /// Similarity of normalized vectors stays within [-1, 1].
        #[test]
        fn proptest_similarity_bounds(
            emb1 in normalized_embedding_strategy(64),
            emb2 in normalized_embedding_strategy(64)
        ) {
            let score = SqliteVectorStore::cosine_similarity(&emb1, &emb2);
            if score != f32::MIN {
                prop_assert!((-1.0 - 1e-4..=1.0 + 1e-4).contains(&score));
                prop_assert!(score.is_finite());
            }
        }

        /// Similarity is symmetric.
        #[test]
        fn proptest_similarity_symmetry(
            emb1 in normalized_embedding_strategy(64),
            emb2 in normalized_embedding_strategy(64)
        ) {
            let ab = SqliteVectorStore::cosine_similarity(&emb1, &emb2);
            let ba = SqliteVectorStore::cosine_similarity(&emb2, &emb1);
            prop_assert!((ab - ba).abs() < 1e-6);
        }

        /// Serialization roundtrip preserves values.
        #[test]
        fn proptest_embedding_roundtrip(
            embedding in prop::collection::vec(-10.0f32..10.0f32, 1..256)
        ) {
            let bytes = SqliteVectorStore::embedding_to_bytes(&embedding);
            prop_assert_eq!(bytes.len(), embedding.len() * 4);
            let restored = SqliteVectorStore::bytes_to_embedding(&bytes).unwrap();
            prop_assert_eq!(embedding, restored);
        }

        /// Byte slices not divisible by 4 are rejected.
        #[test]
        fn proptest_invalid_bytes_length(len in 1usize..100usize) {
            let invalid_bytes = vec![0u8; len * 4 + 1];
            prop_assert!(SqliteVectorStore::bytes_to_embedding(&invalid_bytes).is_err());
        }

        /// Mismatched lengths and zero vectors never pass a similarity floor.
        #[test]
        fn proptest_degenerate_vectors_score_minimum(dim in 1usize..64usize) {
            let zero = vec![0.0f32; dim];
            let unit = vec![1.0f32; dim];
            let shorter = vec![1.0f32; dim.saturating_sub(1).max(1)];

            prop_assert_eq!(SqliteVectorStore::cosine_similarity(&zero, &unit), f32::MIN);
            if shorter.len() != unit.len() {
                prop_assert_eq!(SqliteVectorStore::cosine_similarity(&shorter, &unit), f32::MIN);
            }
        }
    }
}
