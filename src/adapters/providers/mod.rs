//! LLM provider adapters for the generation gateway.

pub mod anthropic;
pub mod mock;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use mock::{MockBehavior, MockProvider};
pub use openai::OpenAiProvider;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response};

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::ProviderConfig;
use crate::domain::ports::LlmProvider;

/// Build a provider from one configuration entry.
///
/// `kind` selects the adapter; unknown kinds are a configuration error.
pub fn build_provider(config: &ProviderConfig) -> AgentResult<Arc<dyn LlmProvider>> {
    match config.kind.as_str() {
        "openai" => Ok(Arc::new(OpenAiProvider::new(config)?)),
        "anthropic" => Ok(Arc::new(AnthropicProvider::new(config)?)),
        "mock" => Ok(Arc::new(
            MockProvider::echo(&config.name).with_timeout_secs(config.timeout_secs),
        )),
        other => Err(AgentError::Config(format!(
            "unknown provider kind '{other}' for provider {}",
            config.name
        ))),
    }
}

pub(super) fn build_http_client(timeout_secs: u64) -> AgentResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AgentError::Config(format!("failed to build HTTP client: {e}")))
}

/// Network-level failures are transient: another provider may still work.
pub(super) fn classify_send_error(provider: &str, err: &reqwest::Error) -> AgentError {
    AgentError::TransientProvider {
        provider: provider.to_string(),
        reason: err.to_string(),
    }
}

/// 429 and 5xx are transient; every other non-success status (auth,
/// malformed request) is fatal and aborts the failover chain.
pub(super) async fn check_provider_status(provider: &str, resp: Response) -> AgentResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    tracing::debug!(provider, %status, body, "provider returned error status");
    let reason = format!("{status}");
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Err(AgentError::TransientProvider {
            provider: provider.to_string(),
            reason,
        })
    } else {
        Err(AgentError::FatalProvider {
            provider: provider.to_string(),
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_provider_unknown_kind() {
        let config = ProviderConfig {
            name: "bad".to_string(),
            kind: "cohere".to_string(),
            api_key: None,
            base_url: None,
            model: "x".to_string(),
            timeout_secs: 10,
        };
        assert!(matches!(
            build_provider(&config),
            Err(AgentError::Config(_))
        ));
    }

    #[test]
    fn test_build_provider_mock() {
        let config = ProviderConfig {
            name: "offline".to_string(),
            kind: "mock".to_string(),
            api_key: None,
            base_url: None,
            model: "none".to_string(),
            timeout_secs: 5,
        };
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "offline");
        assert_eq!(provider.timeout_secs(), 5);
    }
}
