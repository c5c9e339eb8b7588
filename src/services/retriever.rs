//! Retrieval service over the embedding provider and vector store.
//!
//! Retrieval is best-effort: an embedder or store outage degrades to an
//! empty result set with a warning, it never fails the request.

use std::sync::Arc;

use crate::domain::models::{Domain, RetrievalConfig, RetrievalResult};
use crate::domain::ports::{EmbeddingProvider, VectorStore};

/// Outcome of a retrieval pass.
#[derive(Debug, Default)]
pub struct Retrieved {
    /// Results in descending score order, at most `top_k`.
    pub results: Vec<RetrievalResult>,
    /// True when infrastructure failed and the empty set is a degradation,
    /// not a genuine no-match.
    pub degraded: bool,
}

/// Retrieval service for domain knowledge bases.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    config: RetrievalConfig,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            config,
        }
    }

    pub fn top_k(&self) -> usize {
        self.config.top_k
    }

    /// Retrieve chunks for a query from the domain's collection.
    ///
    /// Domains without a collection of their own (the generic fallback)
    /// search across every collection.
    pub async fn retrieve(&self, query: &str, domain: Domain) -> Retrieved {
        match domain.collection() {
            Some(collection) => self.retrieve_from(query, collection).await,
            None => self.retrieve_all(query).await,
        }
    }

    /// Retrieve from a single named collection.
    pub async fn retrieve_from(&self, query: &str, collection: &str) -> Retrieved {
        let vector = match self.embedder.embed(query).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!(collection, error = %e, "embedding failed, degrading to empty retrieval");
                return Retrieved {
                    results: Vec::new(),
                    degraded: true,
                };
            }
        };

        match self
            .store
            .query(collection, &vector, self.config.top_k, self.config.min_score)
            .await
        {
            Ok(scored) => {
                tracing::debug!(collection, hits = scored.len(), "retrieval complete");
                Retrieved {
                    results: scored
                        .into_iter()
                        .map(|(chunk, score)| RetrievalResult::new(chunk, score))
                        .collect(),
                    degraded: false,
                }
            }
            Err(e) => {
                tracing::warn!(collection, error = %e, "vector store query failed, degrading to empty retrieval");
                Retrieved {
                    results: Vec::new(),
                    degraded: true,
                }
            }
        }
    }

    /// Retrieve across every collection, deduplicated by chunk id.
    pub async fn retrieve_all(&self, query: &str) -> Retrieved {
        let collections = match self.store.collections().await {
            Ok(collections) => collections,
            Err(e) => {
                tracing::warn!(error = %e, "collection listing failed, degrading to empty retrieval");
                return Retrieved {
                    results: Vec::new(),
                    degraded: true,
                };
            }
        };

        let mut merged: Vec<RetrievalResult> = Vec::new();
        let mut degraded = false;
        for collection in collections {
            let partial = self.retrieve_from(query, &collection).await;
            degraded |= partial.degraded;
            for result in partial.results {
                match merged.iter_mut().find(|r| r.chunk.id == result.chunk.id) {
                    Some(existing) => {
                        if result.score > existing.score {
                            *existing = result;
                        }
                    }
                    None => merged.push(result),
                }
            }
        }

        merged.sort_by(|a, b| b.score.total_cmp(&a.score));
        merged.truncate(self.config.top_k);

        Retrieved {
            results: merged,
            degraded,
        }
    }
}
