//! Deterministic hash-based embedder.
//!
//! Buckets token hashes into a fixed-dimension vector and L2-normalizes.
//! No network, no model weights. Useful for offline runs and tests where
//! only relative similarity of overlapping token sets matters.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::ports::embedding::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};

pub struct HashEmbedder {
    dimension: usize,
    max_input_chars: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize, max_input_chars: usize) -> Self {
        Self {
            dimension,
            max_input_chars,
        }
    }

    fn check_input(&self, text: &str) -> AgentResult<()> {
        if text.trim().is_empty() {
            return Err(AgentError::Embedding("Input text is empty".to_string()));
        }
        if text.chars().count() > self.max_input_chars {
            return Err(AgentError::Embedding(format!(
                "Input exceeds {} characters",
                self.max_input_chars
            )));
        }
        Ok(())
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in text.to_lowercase().split_whitespace() {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let hashed = hasher.finish();
            let bucket = (hashed % self.dimension as u64) as usize;
            // Alternate sign from a higher hash bit so common tokens
            // don't all push in the same direction.
            let sign = if hashed & (1 << 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let magnitude: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for v in &mut vector {
                *v /= magnitude;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> AgentResult<Vec<f32>> {
        self.check_input(text)?;
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, inputs: &[EmbeddingInput]) -> Vec<EmbeddingOutput> {
        inputs
            .iter()
            .map(|input| EmbeddingOutput {
                id: input.id.clone(),
                result: self
                    .check_input(&input.text)
                    .map(|()| self.vectorize(&input.text)),
            })
            .collect()
    }

    fn max_batch_size(&self) -> usize {
        usize::MAX
    }
}
