//! Anthropic Messages API provider.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::{GenerationParams, ProviderConfig};
use crate::domain::ports::{LlmProvider, ProviderCompletion};

use super::{build_http_client, check_provider_status, classify_send_error};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
enum MessageRole {
    User,
}

/// Cache control marker for Anthropic prompt caching.
#[derive(Debug, Clone, Serialize)]
struct CacheControl {
    #[serde(rename = "type")]
    control_type: String,
}

impl CacheControl {
    fn ephemeral() -> Self {
        Self {
            control_type: "ephemeral".to_string(),
        }
    }
}

/// System prompt content block with optional cache_control.
#[derive(Debug, Clone, Serialize)]
struct SystemContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache_control: Option<CacheControl>,
}

impl SystemContentBlock {
    /// A cacheable text block. The system prompt is stable per agent, so
    /// marking it ephemeral lets repeated calls hit the prompt cache.
    fn cached_text(content: impl Into<String>) -> Self {
        Self {
            block_type: "text".to_string(),
            text: content.into(),
            cache_control: Some(CacheControl::ephemeral()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct Message {
    role: MessageRole,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<Vec<SystemContentBlock>>,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

pub struct AnthropicProvider {
    name: String,
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl AnthropicProvider {
    pub fn new(config: &ProviderConfig) -> AgentResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .ok_or_else(|| {
                AgentError::Config(format!(
                    "provider {} has no api_key and ANTHROPIC_API_KEY is not set",
                    config.name
                ))
            })?;

        Ok(Self {
            name: config.name.clone(),
            http: build_http_client(config.timeout_secs)?,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn build_request(&self, system: &str, prompt: &str, params: &GenerationParams) -> MessagesRequest {
        let system = if system.is_empty() {
            None
        } else {
            Some(vec![SystemContentBlock::cached_text(system)])
        };

        MessagesRequest {
            model: params
                .model
                .clone()
                .unwrap_or_else(|| self.model.clone()),
            max_tokens: params.max_tokens,
            system,
            messages: vec![Message {
                role: MessageRole::User,
                content: vec![ContentBlock::Text {
                    text: prompt.to_string(),
                }],
            }],
            temperature: Some(params.temperature),
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> AgentResult<ProviderCompletion> {
        let request = self.build_request(system, prompt, params);

        let resp = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_send_error(&self.name, &e))?;
        let resp = check_provider_status(&self.name, resp).await?;

        let body: MessagesResponse = resp
            .json()
            .await
            .map_err(|e| AgentError::TransientProvider {
                provider: self.name.clone(),
                reason: format!("response parse failed: {e}"),
            })?;

        let text = body
            .content
            .iter()
            .map(|ContentBlock::Text { text }| text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(ProviderCompletion {
            text,
            tokens_used: Some(body.usage.input_tokens + body.usage.output_tokens),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ProviderConfig {
        ProviderConfig {
            name: "fallback".to_string(),
            kind: "anthropic".to_string(),
            api_key: Some("test-key".to_string()),
            base_url: Some(base_url.to_string()),
            model: "claude-sonnet-4-5".to_string(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn test_build_request_caches_system_prompt() {
        let provider = AnthropicProvider::new(&config("http://localhost:1")).unwrap();
        let request =
            provider.build_request("You are an analyst.", "Hi", &GenerationParams::default());

        let system = request.system.unwrap();
        assert_eq!(system.len(), 1);
        assert!(system[0].cache_control.is_some());
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn test_build_request_omits_empty_system() {
        let provider = AnthropicProvider::new(&config("http://localhost:1")).unwrap();
        let request = provider.build_request("", "Hi", &GenerationParams::default());
        assert!(request.system.is_none());
    }

    #[tokio::test]
    async fn test_complete_joins_text_blocks_and_sums_usage() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", API_VERSION)
            .with_status(200)
            .with_body(
                r#"{"content": [{"type": "text", "text": "Part one."},
                               {"type": "text", "text": "Part two."}],
                    "usage": {"input_tokens": 30, "output_tokens": 12}}"#,
            )
            .create_async()
            .await;

        let provider = AnthropicProvider::new(&config(&server.url())).unwrap();
        let completion = provider
            .complete("system", "prompt", &GenerationParams::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(completion.text, "Part one.\nPart two.");
        assert_eq!(completion.tokens_used, Some(42));
    }

    #[tokio::test]
    async fn test_overloaded_is_transient() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(529)
            .create_async()
            .await;

        let provider = AnthropicProvider::new(&config(&server.url())).unwrap();
        let err = provider
            .complete("s", "p", &GenerationParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::TransientProvider { .. }));
    }

    #[tokio::test]
    async fn test_forbidden_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(403)
            .create_async()
            .await;

        let provider = AnthropicProvider::new(&config(&server.url())).unwrap();
        let err = provider
            .complete("s", "p", &GenerationParams::default())
            .await
            .unwrap_err();
        assert!(err.is_fatal());
    }
}
