//! Policy agent: internal policy and compliance questions.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::errors::AgentResult;
use crate::domain::models::{AgentRequest, AgentResponse, Domain, RetrievalResult};
use crate::domain::ports::DomainAgent;
use crate::services::agents::runtime::{AgentRuntime, AgentVariant};

const SYSTEM_PROMPT: &str = "You are a policy and compliance analyst for an \
early-stage startup. Answer questions about internal policies, regulatory \
obligations, and legal constraints using the policy documents provided. Quote \
the controlling passage when one exists, and say clearly when the documents \
do not settle the question.";

const AUGMENTATION_TOOLS: &[&str] = &["web_search"];
const MIN_USEFUL_RESULTS: usize = 2;

pub struct PolicyAgent {
    runtime: Arc<AgentRuntime>,
}

impl PolicyAgent {
    pub fn new(runtime: Arc<AgentRuntime>) -> Self {
        Self { runtime }
    }
}

impl AgentVariant for PolicyAgent {
    fn domain(&self) -> Domain {
        Domain::Policy
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
impl DomainAgent for PolicyAgent {
    fn domain(&self) -> Domain {
        Domain::Policy
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
