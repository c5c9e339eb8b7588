//! Request and response models for the agent pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::Domain;
use super::invocation::{ProviderAttempt, ToolInvocation};

/// An inbound question, already routed to a domain.
///
/// Read-only once constructed; every pipeline stage borrows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRequest {
    pub id: Uuid,
    /// The user's free-text question.
    pub query: String,
    pub domain: Domain,
    /// Opaque company profile supplied by the caller, passed through to
    /// prompt assembly untouched.
    pub company_context: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

impl AgentRequest {
    pub fn new(query: impl Into<String>, domain: Domain) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.into(),
            domain,
            company_context: serde_json::Value::Null,
            received_at: Utc::now(),
        }
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.company_context = context;
        self
    }
}

/// A citation to a piece of evidence that actually entered the final prompt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SourceRef {
    /// A knowledge-base chunk, by chunk and source document id.
    Chunk { chunk_id: String, source_id: String },
    /// A tool result, by tool name and the URL or identifier it yielded.
    Tool { tool_name: String, reference: String },
}

/// Ways a response can be degraded but still useful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "flag")]
pub enum DegradedFlag {
    /// Retrieval infrastructure was down; the answer used no KB chunks.
    RetrievalDegraded,
    /// A tool the agent wanted was unavailable or failed.
    ToolUnavailable { tool: String },
    /// A structured-output agent could not parse the model output even
    /// after one corrective retry; the raw text is returned instead.
    UnstructuredOutput,
    /// Both retrieval and every tool failed; the answer is LLM-only.
    NoExternalSources,
}

/// The pipeline's answer to a request. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub request_id: Uuid,
    pub domain: Domain,
    pub text: String,
    /// Structured payload for agents with typed output (patentability
    /// assessments, pitch outlines). `None` for free-text agents or when
    /// parsing fell back to raw text.
    pub structured: Option<serde_json::Value>,
    /// Deduplicated citations, limited to data included in the prompt.
    pub sources: Vec<SourceRef>,
    pub tool_invocations: Vec<ToolInvocation>,
    /// Name of the provider that produced the text.
    pub provider_used: String,
    pub provider_attempts: Vec<ProviderAttempt>,
    pub degraded: Vec<DegradedFlag>,
    pub completed_at: DateTime<Utc>,
}

impl AgentResponse {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

/// The router's verdict for a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub domain: Domain,
    /// Normalized confidence in `[0.0, 1.0]`.
    pub confidence: f32,
    /// The signal that carried the decision, for operator visibility.
    pub matched_signal: String,
}
