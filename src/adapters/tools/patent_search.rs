//! Patent search against a PatentsView-style JSON API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::ToolsConfig;
use crate::domain::ports::tool::{Tool, ToolOutput};

use super::http::{build_client, check_status, classify_send_error, SearchParams};

#[derive(Debug, Deserialize)]
struct PatentResponse {
    #[serde(default)]
    patents: Vec<PatentHit>,
}

#[derive(Debug, Deserialize)]
struct PatentHit {
    patent_id: String,
    title: String,
    #[serde(default, rename = "abstract")]
    abstract_text: String,
    #[serde(default)]
    url: String,
}

#[derive(Debug)]
pub struct PatentSearchTool {
    http: Client,
    base_url: String,
    max_results: usize,
}

impl PatentSearchTool {
    pub fn new(config: &ToolsConfig) -> AgentResult<Self> {
        let base_url = config
            .patent_base_url
            .clone()
            .ok_or_else(|| AgentError::Config("tools.patent_base_url is not set".to_string()))?;
        Ok(Self {
            http: build_client(config.timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_results: config.max_results,
        })
    }
}

#[async_trait]
impl Tool for PatentSearchTool {
    fn name(&self) -> &'static str {
        "patent_search"
    }

    fn validate(&self, params: &Value) -> AgentResult<()> {
        SearchParams::parse(self.name(), params).map(|_| ())
    }

    async fn execute(&self, params: &Value) -> AgentResult<ToolOutput> {
        let parsed = SearchParams::parse(self.name(), params)?;
        let limit = parsed.limit(self.max_results);

        let resp = self
            .http
            .get(format!("{}/patents/search", self.base_url))
            .query(&[
                ("q", parsed.query.as_str()),
                ("limit", limit.to_string().as_str()),
            ])
            .send()
            .await
            .map_err(|e| classify_send_error(self.name(), &e))?;
        let resp = check_status(self.name(), resp).await?;

        let body: PatentResponse =
            resp.json()
                .await
                .map_err(|e| AgentError::ToolExecutionFailed {
                    tool: self.name().to_string(),
                    reason: format!("response parse failed: {e}"),
                })?;

        let results: Vec<Value> = body
            .patents
            .into_iter()
            .take(limit)
            .map(|hit| {
                json!({
                    "patent_id": hit.patent_id,
                    "title": hit.title,
                    "abstract": hit.abstract_text,
                    "url": hit.url,
                })
            })
            .collect();

        tracing::debug!(tool = self.name(), hits = results.len(), "patent search complete");
        Ok(ToolOutput {
            tool_name: self.name().to_string(),
            data: json!({ "results": results }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ToolsConfig {
        ToolsConfig {
            patent_base_url: Some(base_url.to_string()),
            ..ToolsConfig::default()
        }
    }

    #[test]
    fn test_new_requires_base_url() {
        let err = PatentSearchTool::new(&ToolsConfig::default()).unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[tokio::test]
    async fn test_execute_maps_patent_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/patents/search")
            .match_query(mockito::Matcher::UrlEncoded(
                "q".to_string(),
                "drone battery".to_string(),
            ))
            .with_status(200)
            .with_body(
                r#"{"patents": [
                    {"patent_id": "US1234567", "title": "Battery pack",
                     "abstract": "A modular battery pack.", "url": "https://p.example/US1234567"}
                ]}"#,
            )
            .create_async()
            .await;

        let tool = PatentSearchTool::new(&config(&server.url())).unwrap();
        let output = tool
            .execute(&json!({ "query": "drone battery" }))
            .await
            .unwrap();

        mock.assert_async().await;
        let results = output.data["results"].as_array().unwrap();
        assert_eq!(results[0]["patent_id"], "US1234567");
        assert_eq!(results[0]["abstract"], "A modular battery pack.");
    }

    #[tokio::test]
    async fn test_server_error_is_transient() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/patents/search")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let tool = PatentSearchTool::new(&config(&server.url())).unwrap();
        let err = tool.execute(&json!({ "query": "q" })).await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_bad_request_is_permanent() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/patents/search")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_body("unsupported query syntax")
            .create_async()
            .await;

        let tool = PatentSearchTool::new(&config(&server.url())).unwrap();
        let err = tool.execute(&json!({ "query": "q" })).await.unwrap_err();
        assert!(!err.is_transient());
    }
}
