//! Records of external calls made while serving a request.
//!
//! Tool invocations and provider attempts are request-scoped audit records.
//! They are appended in call order and never reordered.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Outcome of a single tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "detail")]
pub enum ToolOutcome {
    /// Tool returned a structured result.
    Success(serde_json::Value),
    /// Tool failed after exhausting its retry budget, or failed fatally.
    Error(String),
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// One tool call made on behalf of a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub params: serde_json::Value,
    pub outcome: ToolOutcome,
    /// Wall-clock duration including retries.
    pub latency: Duration,
}

/// Outcome of a single provider attempt at the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "reason")]
pub enum AttemptOutcome {
    Success,
    /// Timeout, rate limit, or server error. The gateway moves on to the
    /// next provider in the request's ordered list.
    TransientError(String),
    /// Auth failure or malformed request. Aborts the chain immediately.
    FatalError(String),
}

impl std::fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::TransientError(reason) => write!(f, "{reason}"),
            Self::FatalError(reason) => write!(f, "fatal: {reason}"),
        }
    }
}

/// One generation attempt against a named provider, in attempt order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderAttempt {
    pub provider: String,
    pub outcome: AttemptOutcome,
    pub latency: Duration,
    pub tokens_used: Option<u64>,
}

/// Generation parameters passed through to providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}

/// A completed generation, with the full attempt trail that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    /// Name of the provider that produced the text.
    pub provider: String,
    pub tokens_used: Option<u64>,
    pub attempts: Vec<ProviderAttempt>,
}
