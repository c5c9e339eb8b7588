//! OpenAI-compatible chat completions provider.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::{GenerationParams, ProviderConfig};
use crate::domain::ports::{LlmProvider, ProviderCompletion};

use super::{build_http_client, check_provider_status, classify_send_error};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: u64,
}

pub struct OpenAiProvider {
    name: String,
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl OpenAiProvider {
    pub fn new(config: &ProviderConfig) -> AgentResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                AgentError::Config(format!(
                    "provider {} has no api_key and OPENAI_API_KEY is not set",
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
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
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
        let model = params.model.as_deref().unwrap_or(&self.model);
        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_send_error(&self.name, &e))?;
        let resp = check_provider_status(&self.name, resp).await?;

        let body: ChatResponse = resp
            .json()
            .await
            .map_err(|e| AgentError::TransientProvider {
                provider: self.name.clone(),
                reason: format!("response parse failed: {e}"),
            })?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::TransientProvider {
                provider: self.name.clone(),
                reason: "response contained no choices".to_string(),
            })?;

        Ok(ProviderCompletion {
            text: choice.message.content,
            tokens_used: body.usage.map(|u| u.total_tokens),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ProviderConfig {
        ProviderConfig {
            name: "primary".to_string(),
            kind: "openai".to_string(),
            api_key: Some("sk-test".to_string()),
            base_url: Some(base_url.to_string()),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn test_new_requires_api_key() {
        temp_env::with_var("OPENAI_API_KEY", None::<&str>, || {
            let mut cfg = config("http://localhost:1");
            cfg.api_key = None;
            assert!(matches!(
                OpenAiProvider::new(&cfg),
                Err(AgentError::Config(_))
            ));
        });
    }

    #[tokio::test]
    async fn test_complete_happy_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_body(
                r#"{"choices": [{"message": {"content": "The moat is distribution."}}],
                    "usage": {"total_tokens": 84}}"#,
            )
            .create_async()
            .await;

        let provider = OpenAiProvider::new(&config(&server.url())).unwrap();
        let completion = provider
            .complete("You are terse.", "What is the moat?", &GenerationParams::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(completion.text, "The moat is distribution.");
        assert_eq!(completion.tokens_used, Some(84));
    }

    #[tokio::test]
    async fn test_rate_limit_is_transient() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .create_async()
            .await;

        let provider = OpenAiProvider::new(&config(&server.url())).unwrap();
        let err = provider
            .complete("s", "p", &GenerationParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::TransientProvider { .. }));
    }

    #[tokio::test]
    async fn test_unauthorized_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .create_async()
            .await;

        let provider = OpenAiProvider::new(&config(&server.url())).unwrap();
        let err = provider
            .complete("s", "p", &GenerationParams::default())
            .await
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_model_override_from_params() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"model": "gpt-4o"}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"content": "ok"}}]}"#)
            .create_async()
            .await;

        let provider = OpenAiProvider::new(&config(&server.url())).unwrap();
        let params = GenerationParams {
            model: Some("gpt-4o".to_string()),
            ..GenerationParams::default()
        };
        provider.complete("s", "p", &params).await.unwrap();
        mock.assert_async().await;
    }
}
