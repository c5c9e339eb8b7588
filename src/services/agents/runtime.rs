//! Shared pipeline behind every domain agent.
//!
//! Variants plug in prompt framing, tool selection, and structured-output
//! parsing; the runtime owns the pipeline order: retrieve, augment with
//! tools, assemble the prompt, generate, post-process.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::domain::errors::AgentResult;
use crate::domain::models::{
    AgentRequest, AgentResponse, DegradedFlag, Domain, GenerationParams, RetrievalResult,
    ToolInvocation,
};
use crate::domain::ports::LlmProvider;
use crate::services::agents::prompt::assemble;
use crate::services::gateway::LlmGateway;
use crate::services::retriever::Retriever;
use crate::services::tool_client::ToolClient;

/// Variant-specific behavior plugged into [`AgentRuntime::run`].
pub trait AgentVariant: Send + Sync {
    fn domain(&self) -> Domain;

    fn system_prompt(&self) -> &str;

    /// Retrieval results below this count count as thin.
    fn min_useful_results(&self) -> usize {
        2
    }

    /// Supplementary tool calls for this request. Receives the retrieval
    /// results so variants can gate on how thin they are, or mine them
    /// for URLs. An empty plan skips augmentation.
    fn augmentation_plan(
        &self,
        request: &AgentRequest,
        results: &[RetrievalResult],
    ) -> Vec<(&'static str, Value)>;

    /// Parse the model output into this variant's structured payload.
    /// `None` marks a free-text variant.
    fn parse_structured(&self, text: &str) -> Option<AgentResult<Value>> {
        let _ = text;
        None
    }

    /// Instruction appended for the one corrective retry after a parse
    /// failure.
    fn corrective_instruction(&self) -> &'static str {
        ""
    }
}

pub struct AgentRuntime {
    retriever: Arc<Retriever>,
    tools: Arc<ToolClient>,
    gateway: LlmGateway,
    providers: Vec<Arc<dyn LlmProvider>>,
    params: GenerationParams,
}

impl AgentRuntime {
    pub fn new(
        retriever: Arc<Retriever>,
        tools: Arc<ToolClient>,
        providers: Vec<Arc<dyn LlmProvider>>,
        params: GenerationParams,
    ) -> Self {
        Self {
            retriever,
            tools,
            gateway: LlmGateway::new(),
            providers,
            params,
        }
    }

    /// Run the shared pipeline for one request.
    ///
    /// Never fails for degraded inputs: retrieval outages, tool failures
    /// and unparseable structured output all downgrade to flags on the
    /// response. The only error paths are provider exhaustion and fatal
    /// provider errors from the gateway.
    pub async fn run(
        &self,
        variant: &dyn AgentVariant,
        request: &AgentRequest,
    ) -> AgentResult<AgentResponse> {
        let mut degraded = Vec::new();

        let retrieved = self
            .retriever
            .retrieve(&request.query, variant.domain())
            .await;
        if retrieved.degraded {
            degraded.push(DegradedFlag::RetrievalDegraded);
        }
        tracing::debug!(
            request_id = %request.id,
            domain = %variant.domain(),
            hits = retrieved.results.len(),
            "retrieval finished"
        );

        let plan = variant.augmentation_plan(request, &retrieved.results);
        let invocations: Vec<ToolInvocation> = futures::future::join_all(
            plan.into_iter()
                .map(|(tool, params)| self.tools.invoke(tool, params)),
        )
        .await;
        for invocation in &invocations {
            if !invocation.outcome.is_success() {
                degraded.push(DegradedFlag::ToolUnavailable {
                    tool: invocation.tool_name.clone(),
                });
            }
        }

        let assembled = assemble(request, &retrieved.results, &invocations);
        if assembled.sources.is_empty() {
            degraded.push(DegradedFlag::NoExternalSources);
        }

        let generation = self
            .gateway
            .generate(
                variant.system_prompt(),
                &assembled.text,
                &self.params,
                &self.providers,
            )
            .await?;

        let mut text = generation.text;
        let mut provider_used = generation.provider;
        let mut attempts = generation.attempts;
        let mut structured = None;

        match variant.parse_structured(&text) {
            None => {}
            Some(Ok(value)) => structured = Some(value),
            Some(Err(parse_err)) => {
                tracing::debug!(
                    request_id = %request.id,
                    error = %parse_err,
                    "structured parse failed, retrying with corrective instruction"
                );
                let corrective = format!(
                    "{}\n\n{}",
                    assembled.text,
                    variant.corrective_instruction()
                );
                match self
                    .gateway
                    .generate(
                        variant.system_prompt(),
                        &corrective,
                        &self.params,
                        &self.providers,
                    )
                    .await
                {
                    Ok(second) => {
                        attempts.extend(second.attempts);
                        match variant.parse_structured(&second.text) {
                            Some(Ok(value)) => {
                                structured = Some(value);
                                text = second.text;
                                provider_used = second.provider;
                            }
                            _ => degraded.push(DegradedFlag::UnstructuredOutput),
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            request_id = %request.id,
                            error = %e,
                            "corrective retry failed, returning raw text"
                        );
                        degraded.push(DegradedFlag::UnstructuredOutput);
                    }
                }
            }
        }

        Ok(AgentResponse {
            request_id: request.id,
            domain: variant.domain(),
            text,
            structured,
            sources: assembled.sources,
            tool_invocations: invocations,
            provider_used,
            provider_attempts: attempts,
            degraded,
            completed_at: Utc::now(),
        })
    }
}

/// Minimal runtime for exercising variant hooks in unit tests without a
/// live pipeline.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::domain::errors::AgentResult;
    use crate::domain::models::{Chunk, RetrievalConfig, RetryConfig};
    use crate::domain::ports::embedding::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};
    use crate::domain::ports::VectorStore;
    use crate::services::retry::RetryPolicy;
    use async_trait::async_trait;

    struct NullEmbedder;

    #[async_trait]
    impl EmbeddingProvider for NullEmbedder {
        fn name(&self) -> &'static str {
            "null"
        }

        fn dimension(&self) -> usize {
            1
        }

        async fn embed(&self, _text: &str) -> AgentResult<Vec<f32>> {
            Ok(vec![0.0])
        }

        async fn embed_batch(&self, inputs: &[EmbeddingInput]) -> Vec<EmbeddingOutput> {
            let mut outputs = Vec::new();
            for input in inputs {
                outputs.push(EmbeddingOutput {
                    id: input.id.clone(),
                    result: self.embed(&input.text).await,
                });
            }
            outputs
        }

        fn max_batch_size(&self) -> usize {
            1
        }
    }

    struct NullStore;

    #[async_trait]
    impl VectorStore for NullStore {
        fn name(&self) -> &'static str {
            "null"
        }

        async fn collections(&self) -> AgentResult<Vec<String>> {
            Ok(vec![])
        }

        async fn collection_dimension(&self, _collection: &str) -> AgentResult<usize> {
            Ok(1)
        }

        async fn query(
            &self,
            _collection: &str,
            _vector: &[f32],
            _top_k: usize,
            _min_score: f32,
        ) -> AgentResult<Vec<(Chunk, f32)>> {
            Ok(vec![])
        }

        async fn upsert(&self, _chunk: &Chunk, _vector: &[f32]) -> AgentResult<()> {
            Ok(())
        }
    }

    pub(crate) fn null_runtime() -> Arc<AgentRuntime> {
        Arc::new(AgentRuntime::new(
            Arc::new(Retriever::new(
                Arc::new(NullEmbedder),
                Arc::new(NullStore),
                RetrievalConfig::default(),
            )),
            Arc::new(ToolClient::new(RetryPolicy::from(&RetryConfig::default()))),
            vec![],
            GenerationParams::default(),
        ))
    }

    pub(crate) fn chunk_results(collection: &str, n: usize) -> Vec<RetrievalResult> {
        (0..n)
            .map(|i| {
                RetrievalResult::new(
                    Chunk::new(format!("c{i}"), format!("text {i}"), "doc-1", collection),
                    0.8,
                )
            })
            .collect()
    }
}
