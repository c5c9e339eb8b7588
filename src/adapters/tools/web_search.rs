//! Web search over a SearXNG-compatible JSON endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::ToolsConfig;
use crate::domain::ports::tool::{Tool, ToolOutput};

use super::http::{build_client, check_status, classify_send_error, SearchParams};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    url: String,
    title: String,
    /// SearXNG calls the snippet `content`.
    #[serde(default)]
    content: String,
}

#[derive(Debug)]
pub struct WebSearchTool {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    max_results: usize,
}

impl WebSearchTool {
    pub fn new(config: &ToolsConfig) -> AgentResult<Self> {
        let base_url = config
            .search_base_url
            .clone()
            .ok_or_else(|| AgentError::Config("tools.search_base_url is not set".to_string()))?;
        Ok(Self {
            http: build_client(config.timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.search_api_key.clone(),
            max_results: config.max_results,
        })
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &'static str {
        "web_search"
    }

    fn validate(&self, params: &Value) -> AgentResult<()> {
        SearchParams::parse(self.name(), params).map(|_| ())
    }

    async fn execute(&self, params: &Value) -> AgentResult<ToolOutput> {
        let parsed = SearchParams::parse(self.name(), params)?;
        let limit = parsed.limit(self.max_results);

        let mut req = self.http.get(format!("{}/search", self.base_url)).query(&[
            ("q", parsed.query.as_str()),
            ("format", "json"),
            ("categories", "general"),
        ]);
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {key}"));
        }

        let resp = req
            .send()
            .await
            .map_err(|e| classify_send_error(self.name(), &e))?;
        let resp = check_status(self.name(), resp).await?;

        let body: SearchResponse =
            resp.json()
                .await
                .map_err(|e| AgentError::ToolExecutionFailed {
                    tool: self.name().to_string(),
                    reason: format!("response parse failed: {e}"),
                })?;

        let results: Vec<Value> = body
            .results
            .into_iter()
            .take(limit)
            .map(|hit| {
                json!({
                    "url": hit.url,
                    "title": hit.title,
                    "snippet": hit.content,
                })
            })
            .collect();

        tracing::debug!(tool = self.name(), hits = results.len(), "web search complete");
        Ok(ToolOutput {
            tool_name: self.name().to_string(),
            data: json!({ "results": results }),
        })
    }
}
