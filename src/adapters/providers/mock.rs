//! Scriptable mock provider.
//!
//! Drives gateway and agent tests without network access, and backs the
//! `mock` provider kind for offline runs. Each call consumes the next
//! scripted behavior; the last one repeats once the script runs out.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::time::{sleep, Duration};

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::GenerationParams;
use crate::domain::ports::{LlmProvider, ProviderCompletion};

#[derive(Debug, Clone)]
pub enum MockBehavior {
    Success { text: String, tokens: Option<u64> },
    Transient(String),
    Fatal(String),
    /// Never completes within any reasonable attempt window. Exercises
    /// the gateway's per-attempt timeout.
    Hang,
}

pub struct MockProvider {
    name: String,
    timeout_secs: u64,
    script: Vec<MockBehavior>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(name: impl Into<String>, script: Vec<MockBehavior>) -> Self {
        Self {
            name: name.into(),
            timeout_secs: 1,
            script,
            calls: AtomicUsize::new(0),
        }
    }

    /// A provider that always succeeds with the given text.
    pub fn succeeding(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            name,
            vec![MockBehavior::Success {
                text: text.into(),
                tokens: Some(10),
            }],
        )
    }

    /// Echo mode: succeed with a canned line derived from the prompt.
    pub fn echo(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Number of completion calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn echo_text(&self, prompt: &str) -> String {
        let head: String = prompt.chars().take(120).collect();
        format!("[{}] {head}", self.name)
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    async fn complete(
        &self,
        _system: &str,
        prompt: &str,
        _params: &GenerationParams,
    ) -> AgentResult<ProviderCompletion> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self.script.get(call).or_else(|| self.script.last());

        match behavior {
            None => Ok(ProviderCompletion {
                text: self.echo_text(prompt),
                tokens_used: Some(prompt.split_whitespace().count() as u64),
            }),
            Some(MockBehavior::Success { text, tokens }) => Ok(ProviderCompletion {
                text: text.clone(),
                tokens_used: *tokens,
            }),
            Some(MockBehavior::Transient(reason)) => Err(AgentError::TransientProvider {
                provider: self.name.clone(),
                reason: reason.clone(),
            }),
            Some(MockBehavior::Fatal(reason)) => Err(AgentError::FatalProvider {
                provider: self.name.clone(),
                reason: reason.clone(),
            }),
            Some(MockBehavior::Hang) => {
                sleep(Duration::from_secs(86_400)).await;
                Err(AgentError::TransientProvider {
                    provider: self.name.clone(),
                    reason: "hang elapsed".to_string(),
                })
            }
        }
    }
}
