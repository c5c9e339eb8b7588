//! OpenAI embedding provider adapter.
//!
//! Talks to the OpenAI `/v1/embeddings` endpoint. Compatible with any
//! OpenAI-compatible embedding API (e.g., Azure OpenAI, local servers).

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::EmbeddingConfig;
use crate::domain::ports::embedding::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};

/// Configuration for the OpenAI embedder.
#[derive(Debug, Clone)]
pub struct OpenAiEmbedderConfig {
    /// API key. Falls back to `OPENAI_API_KEY` env var.
    pub api_key: Option<String>,
    /// Base URL for the API. Default: `https://api.openai.com/v1`.
    pub base_url: String,
    /// Embedding model. Default: `text-embedding-3-small`.
    pub model: String,
    /// Expected embedding dimension. Default: 1536.
    pub dimension: usize,
    /// Request timeout in seconds. Default: 30.
    pub timeout_secs: u64,
    /// Maximum texts per single API request. Default: 100.
    pub max_batch_size: usize,
    /// Maximum input length in characters. Default: 8192.
    pub max_input_chars: usize,
}

impl Default for OpenAiEmbedderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
            timeout_secs: 30,
            max_batch_size: 100,
            max_input_chars: 8192,
        }
    }
}

impl From<&EmbeddingConfig> for OpenAiEmbedderConfig {
    fn from(config: &EmbeddingConfig) -> Self {
        let defaults = Self::default();
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone().unwrap_or(defaults.base_url),
            model: config.model.clone(),
            dimension: config.dimension,
            timeout_secs: config.timeout_secs,
            max_batch_size: config.max_batch_size,
            max_input_chars: config.max_input_chars,
        }
    }
}

impl OpenAiEmbedderConfig {
    fn get_api_key(&self) -> AgentResult<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                AgentError::Embedding(
                    "OpenAI API key not set. Set OPENAI_API_KEY env var or configure api_key."
                        .to_string(),
                )
            })
    }
}

/// OpenAI embedding provider.
pub struct OpenAiEmbedder {
    config: OpenAiEmbedderConfig,
    client: Arc<reqwest::Client>,
}

impl OpenAiEmbedder {
    pub fn new(config: OpenAiEmbedderConfig) -> AgentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Embedding(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    fn check_input(&self, text: &str) -> AgentResult<()> {
        if text.trim().is_empty() {
            return Err(AgentError::Embedding("Input text is empty".to_string()));
        }
        if text.chars().count() > self.config.max_input_chars {
            return Err(AgentError::Embedding(format!(
                "Input exceeds {} characters",
                self.config.max_input_chars
            )));
        }
        Ok(())
    }

    async fn call_embeddings_api(&self, texts: Vec<String>) -> AgentResult<Vec<Vec<f32>>> {
        let api_key = self.config.get_api_key()?;
        let url = format!("{}/embeddings", self.config.base_url);

        let request_body = EmbeddingsRequest {
            model: self.config.model.clone(),
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AgentError::Embedding(format!("Embedding API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(AgentError::Embedding(format!(
                "Embedding API returned {status}: {body}"
            )));
        }

        let result: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Embedding(format!("Failed to parse embedding response: {e}")))?;

        // Sort by index to maintain input order
        let mut data = result.data;
        data.sort_by_key(|d| d.index);

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> AgentResult<Vec<f32>> {
        self.check_input(text)?;
        let results = self.call_embeddings_api(vec![text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Embedding("Empty embedding response".to_string()))
    }

    async fn embed_batch(&self, inputs: &[EmbeddingInput]) -> Vec<EmbeddingOutput> {
        let mut all_outputs = Vec::with_capacity(inputs.len());

        // Reject bad items up front; only well-formed ones go upstream.
        let mut valid: Vec<&EmbeddingInput> = Vec::with_capacity(inputs.len());
        for input in inputs {
            match self.check_input(&input.text) {
                Ok(()) => valid.push(input),
                Err(e) => all_outputs.push(EmbeddingOutput {
                    id: input.id.clone(),
                    result: Err(e),
                }),
            }
        }

        for batch in valid.chunks(self.config.max_batch_size) {
            let texts: Vec<String> = batch.iter().map(|i| i.text.clone()).collect();
            match self.call_embeddings_api(texts).await {
                Ok(vectors) => {
                    for (input, vector) in batch.iter().zip(vectors) {
                        all_outputs.push(EmbeddingOutput {
                            id: input.id.clone(),
                            result: Ok(vector),
                        });
                    }
                }
                Err(e) => {
                    // One upstream failure fails this batch's items, not the call.
                    for input in batch {
                        all_outputs.push(EmbeddingOutput {
                            id: input.id.clone(),
                            result: Err(AgentError::Embedding(e.to_string())),
                        });
                    }
                }
            }
        }

        all_outputs
    }

    fn max_batch_size(&self) -> usize {
        self.config.max_batch_size
    }
}

// -- OpenAI API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
