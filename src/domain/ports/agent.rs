//! Shared contract for domain agents.

use async_trait::async_trait;

use crate::domain::errors::AgentResult;
use crate::domain::models::{AgentRequest, AgentResponse, Domain};

/// The contract every domain agent satisfies.
///
/// Variants differ only in prompt framing, tool selection, and
/// post-processing; the pipeline itself lives in the shared runtime.
#[async_trait]
pub trait DomainAgent: Send + Sync {
    /// The domain this agent serves.
    fn domain(&self) -> Domain;

    /// System instructions framing the model for this domain.
    fn system_prompt(&self) -> &str;

    /// Retrieval results below this count trigger tool augmentation.
    fn min_useful_results(&self) -> usize;

    /// Tools this agent may call to supplement thin retrieval.
    fn augmentation_tools(&self) -> &'static [&'static str];

    /// Answer a routed request.
    async fn handle(&self, request: &AgentRequest) -> AgentResult<AgentResponse>;
}
