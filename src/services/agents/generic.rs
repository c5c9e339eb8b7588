//! Generic fallback agent for requests no domain claims.
//!
//! Retrieval for the generic domain fans out across every collection, so
//! low-confidence questions still get whatever the knowledge base holds.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::errors::AgentResult;
use crate::domain::models::{AgentRequest, AgentResponse, Domain, RetrievalResult};
use crate::domain::ports::DomainAgent;
use crate::services::agents::runtime::{AgentRuntime, AgentVariant};

const SYSTEM_PROMPT: &str = "You are a general advisor for an early-stage \
startup. Answer the question using whatever evidence is provided, note which \
specialty (pitch, competitive, marketing, patent, policy, team) the question \
is closest to, and be explicit about uncertainty.";

const AUGMENTATION_TOOLS: &[&str] = &["web_search"];
const MIN_USEFUL_RESULTS: usize = 2;

pub struct GenericAgent {
    runtime: Arc<AgentRuntime>,
}

impl GenericAgent {
    pub fn new(runtime: Arc<AgentRuntime>) -> Self {
        Self { runtime }
    }
}

impl AgentVariant for GenericAgent {
    fn domain(&self) -> Domain {
        Domain::Generic
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT
    }

    fn min_useful_results(&self) -> usize {
        MIN_USEFUL_RESULTS
    }

    fn augmentation_plan(
        &self,
        request: &AgentRequest,
        results: &[RetrievalResult],
    ) -> Vec<(&'static str, Value)> {
        if results.len() < MIN_USEFUL_RESULTS {
            vec![("web_search", json!({ "query": request.query }))]
        } else {
            Vec::new()
        }
    }
}

#[async_trait]
impl DomainAgent for GenericAgent {
    fn domain(&self) -> Domain {
        Domain::Generic
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT
    }

    fn min_useful_results(&self) -> usize {
        MIN_USEFUL_RESULTS
    }

    fn augmentation_tools(&self) -> &'static [&'static str] {
        AUGMENTATION_TOOLS
    }

    async fn handle(&self, request: &AgentRequest) -> AgentResult<AgentResponse> {
        self.runtime.run(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::agents::runtime::testing::{chunk_results, null_runtime};

    #[test]
    fn test_fallback_serves_generic_domain() {
        let agent = GenericAgent::new(null_runtime());
        assert_eq!(DomainAgent::domain(&agent), Domain::Generic);
        assert!(Domain::Generic.collection().is_none());
    }

    #[test]
    fn test_web_search_gated_on_thin_retrieval() {
        let agent = GenericAgent::new(null_runtime());
        let request = AgentRequest::new("what should we do next quarter?", Domain::Generic);

        let thin = AgentVariant::augmentation_plan(&agent, &request, &[]);
        assert_eq!(thin.len(), 1);

        let rich =
            AgentVariant::augmentation_plan(&agent, &request, &chunk_results("pitch_decks", 2));
        assert!(rich.is_empty());
    }
}
