//! Team agent: hiring, org design, and people-process questions.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::errors::AgentResult;
use crate::domain::models::{AgentRequest, AgentResponse, Domain, RetrievalResult};
use crate::domain::ports::DomainAgent;
use crate::services::agents::runtime::{AgentRuntime, AgentVariant};

const SYSTEM_PROMPT: &str = "You are an advisor on team building for an \
early-stage startup. Answer questions about hiring, org design, compensation, \
and people processes using the playbooks provided. Tailor advice to the \
company's stage and size from the company context.";

const AUGMENTATION_TOOLS: &[&str] = &["web_search"];
const MIN_USEFUL_RESULTS: usize = 2;

pub struct TeamAgent {
    runtime: Arc<AgentRuntime>,
}

impl TeamAgent {
    pub fn new(runtime: Arc<AgentRuntime>) -> Self {
        Self { runtime }
    }
}

impl AgentVariant for TeamAgent {
    fn domain(&self) -> Domain {
        Domain::Team
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
impl DomainAgent for TeamAgent {
    fn domain(&self) -> Domain {
        Domain::Team
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
