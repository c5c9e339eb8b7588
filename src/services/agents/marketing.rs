//! Marketing agent: campaign and messaging guidance.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::errors::AgentResult;
use crate::domain::models::{AgentRequest, AgentResponse, Domain, RetrievalResult};
use crate::domain::ports::DomainAgent;
use crate::services::agents::runtime::{AgentRuntime, AgentVariant};

const SYSTEM_PROMPT: &str = "You are a marketing strategist for an early-stage \
startup. Advise on campaigns, channels, and messaging using the campaign \
history and search results provided. When image results are available, \
reference them as creative direction. Ground recommendations in the evidence.";

const AUGMENTATION_TOOLS: &[&str] = &["web_search", "image_search"];
const MIN_USEFUL_RESULTS: usize = 2;

pub struct MarketingAgent {
    runtime: Arc<AgentRuntime>,
}

impl MarketingAgent {
    pub fn new(runtime: Arc<AgentRuntime>) -> Self {
        Self { runtime }
    }
}

impl AgentVariant for MarketingAgent {
    fn domain(&self) -> Domain {
        Domain::Marketing
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
            vec![
                ("web_search", json!({ "query": request.query })),
                ("image_search", json!({ "query": request.query })),
            ]
        } else {
            Vec::new()
        }
    }
}

#[async_trait]
impl DomainAgent for MarketingAgent {
    fn domain(&self) -> Domain {
        Domain::Marketing
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
