//! LLM provider port for the generation gateway.

use async_trait::async_trait;

use crate::domain::errors::AgentResult;
use crate::domain::models::GenerationParams;

/// A provider's raw completion, before the gateway wraps it in a
/// `Generation` with the attempt trail.
#[derive(Debug, Clone)]
pub struct ProviderCompletion {
    pub text: String,
    pub tokens_used: Option<u64>,
}

/// Trait for text-generation backends.
///
/// Implementations classify their own failures: rate limits, timeouts and
/// server errors as `TransientProvider`; auth and malformed requests as
/// `FatalProvider`. The gateway's failover logic depends on that split.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name used in logs and attempt records.
    fn name(&self) -> String;

    /// Per-attempt timeout the gateway should enforce, in seconds.
    fn timeout_secs(&self) -> u64;

    /// Generate a completion for the prompt.
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> AgentResult<ProviderCompletion>;
}
