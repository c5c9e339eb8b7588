//! Competitive agent: rival landscape analysis.
//!
//! Beyond the usual thin-retrieval web search, this variant mines the
//! retrieved competitor profiles for URLs and extracts page content from
//! up to two of them, so answers can cite what rivals actually publish.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::errors::AgentResult;
use crate::domain::models::{AgentRequest, AgentResponse, Domain, RetrievalResult};
use crate::domain::ports::DomainAgent;
use crate::services::agents::runtime::{AgentRuntime, AgentVariant};

const SYSTEM_PROMPT: &str = "You are a competitive-intelligence analyst for an \
early-stage startup. Compare the company against rivals using the competitor \
profiles, search results, and extracted pages provided. Be specific about \
positioning, pricing, and feature gaps, and cite your evidence.";

const AUGMENTATION_TOOLS: &[&str] = &["web_search", "content_extract"];
const MIN_USEFUL_RESULTS: usize = 2;
const MAX_EXTRACTED_PAGES: usize = 2;

pub struct CompetitiveAgent {
    runtime: Arc<AgentRuntime>,
}

impl CompetitiveAgent {
    pub fn new(runtime: Arc<AgentRuntime>) -> Self {
        Self { runtime }
    }
}

impl AgentVariant for CompetitiveAgent {
    fn domain(&self) -> Domain {
        Domain::Competitive
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
        let mut plan = Vec::new();
        if results.len() < MIN_USEFUL_RESULTS {
            plan.push(("web_search", json!({ "query": request.query })));
        }
        for url in mine_urls(results, MAX_EXTRACTED_PAGES) {
            plan.push(("content_extract", json!({ "url": url })));
        }
        plan
    }
}

#[async_trait]
impl DomainAgent for CompetitiveAgent {
    fn domain(&self) -> Domain {
        Domain::Competitive
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

/// Collect distinct http(s) URLs mentioned in chunk text, first-seen order.
fn mine_urls(results: &[RetrievalResult], cap: usize) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for result in results {
        for token in result.chunk.text.split_whitespace() {
            if !(token.starts_with("http://") || token.starts_with("https://")) {
                continue;
            }
            let url = token.trim_end_matches(['.', ',', ')', ';']).to_string();
            if !urls.contains(&url) {
                urls.push(url);
            }
            if urls.len() == cap {
                return urls;
            }
        }
    }
    urls
}
