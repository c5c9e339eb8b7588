//! Shared HTTP plumbing for tool adapters.
//!
//! Failures are split into transient (timeouts, connect errors, 429, 5xx)
//! and permanent ones so the retry layer only retries calls that can
//! plausibly succeed on a second attempt.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::errors::{AgentError, AgentResult};

pub(super) fn build_client(timeout_secs: u64) -> AgentResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AgentError::Config(format!("failed to build HTTP client: {e}")))
}

pub(super) fn classify_send_error(tool: &str, err: &reqwest::Error) -> AgentError {
    if err.is_timeout() || err.is_connect() {
        AgentError::TransientTool {
            tool: tool.to_string(),
            reason: err.to_string(),
        }
    } else {
        AgentError::ToolExecutionFailed {
            tool: tool.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Map a non-success status to an error, consuming the body for context.
pub(super) async fn check_status(tool: &str, resp: Response) -> AgentResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let reason = format!("{status}: {body}");
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Err(AgentError::TransientTool {
            tool: tool.to_string(),
            reason,
        })
    } else {
        Err(AgentError::ToolExecutionFailed {
            tool: tool.to_string(),
            reason,
        })
    }
}

/// Common parameter shape for the search-backed tools.
#[derive(Debug, Deserialize)]
pub(super) struct SearchParams {
    pub query: String,
    #[serde(default)]
    pub max_results: Option<usize>,
}

impl SearchParams {
    pub(super) fn parse(tool: &str, params: &Value) -> AgentResult<Self> {
        let parsed: Self =
            serde_json::from_value(params.clone()).map_err(|e| AgentError::InvalidToolParams {
                tool: tool.to_string(),
                reason: e.to_string(),
            })?;
        if parsed.query.trim().is_empty() {
            return Err(AgentError::InvalidToolParams {
                tool: tool.to_string(),
                reason: "query must not be empty".to_string(),
            });
        }
        if parsed.max_results == Some(0) {
            return Err(AgentError::InvalidToolParams {
                tool: tool.to_string(),
                reason: "max_results must be at least 1".to_string(),
            });
        }
        Ok(parsed)
    }

    /// Requested result count, clamped to the configured ceiling.
    pub(super) fn limit(&self, cap: usize) -> usize {
        self.max_results.unwrap_or(cap).min(cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_rejects_empty_query() {
        let err = SearchParams::parse("web_search", &json!({ "query": "  " })).unwrap_err();
        assert!(matches!(err, AgentError::InvalidToolParams { .. }));
    }

    #[test]
    fn test_parse_rejects_zero_max_results() {
        let err =
            SearchParams::parse("web_search", &json!({ "query": "q", "max_results": 0 }))
                .unwrap_err();
        assert!(matches!(err, AgentError::InvalidToolParams { .. }));
    }

    #[test]
    fn test_parse_rejects_missing_query() {
        let err = SearchParams::parse("web_search", &json!({ "max_results": 3 })).unwrap_err();
        assert!(matches!(err, AgentError::InvalidToolParams { .. }));
    }

    #[test]
    fn test_limit_clamps_to_cap() {
        let params =
            SearchParams::parse("web_search", &json!({ "query": "q", "max_results": 50 }))
                .unwrap();
        assert_eq!(params.limit(10), 10);

        let params = SearchParams::parse("web_search", &json!({ "query": "q" })).unwrap();
        assert_eq!(params.limit(10), 10);

        let params =
            SearchParams::parse("web_search", &json!({ "query": "q", "max_results": 3 }))
                .unwrap();
        assert_eq!(params.limit(10), 3);
    }
}
