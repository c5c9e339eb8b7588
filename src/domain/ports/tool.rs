//! Tool port for external lookup services.

use async_trait::async_trait;

use crate::domain::errors::AgentResult;

/// Structured output of a successful tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Name of the tool that produced the data.
    pub tool_name: String,
    /// Tool-specific result payload.
    pub data: serde_json::Value,
}

/// Uniform contract for external lookup tools.
///
/// Tools are stateless: concurrent executions must not interfere.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Registry name (e.g., "web_search").
    fn name(&self) -> &'static str;

    /// Check parameters before execution.
    ///
    /// Rejection is fatal for the invocation; the client never retries
    /// invalid parameters.
    fn validate(&self, params: &serde_json::Value) -> AgentResult<()>;

    /// Execute the tool with validated parameters.
    ///
    /// Timeouts, 429s, and 5xx surface as `TransientTool` so the client
    /// can apply its retry budget; everything else maps to
    /// `ToolExecutionFailed` and is not retried.
    async fn execute(&self, params: &serde_json::Value) -> AgentResult<ToolOutput>;
}
