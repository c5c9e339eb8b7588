//! Image search over the same SearXNG-compatible endpoint as web search,
//! restricted to the `images` category.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::ToolsConfig;
use crate::domain::ports::tool::{Tool, ToolOutput};

use super::http::{build_client, check_status, classify_send_error, SearchParams};

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    results: Vec<ImageHit>,
}

#[derive(Debug, Deserialize)]
struct ImageHit {
    url: String,
    title: String,
    #[serde(default)]
    thumbnail_src: String,
}

pub struct ImageSearchTool {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    max_results: usize,
}

impl ImageSearchTool {
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
impl Tool for ImageSearchTool {
    fn name(&self) -> &'static str {
        "image_search"
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
            ("categories", "images"),
        ]);
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {key}"));
        }

        let resp = req
            .send()
            .await
            .map_err(|e| classify_send_error(self.name(), &e))?;
        let resp = check_status(self.name(), resp).await?;

        let body: ImageResponse =
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
                    "thumbnail": hit.thumbnail_src,
                })
            })
            .collect();

        tracing::debug!(tool = self.name(), hits = results.len(), "image search complete");
        Ok(ToolOutput {
            tool_name: self.name().to_string(),
            data: json!({ "results": results }),
        })
    }
}
