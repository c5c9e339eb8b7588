//! Tool registry and dispatch.
//!
//! All tool calls go through [`ToolClient`]: parameters are validated
//! before any network traffic, transient failures are retried under the
//! configured policy, and every call can be captured as a
//! [`ToolInvocation`] record for the response audit trail.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::adapters::tools::{
    ContentExtractTool, ImageSearchTool, PatentSearchTool, WebSearchTool,
};
use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::{ToolInvocation, ToolOutcome, ToolsConfig};
use crate::domain::ports::{Tool, ToolOutput};
use crate::services::retry::RetryPolicy;

pub struct ToolClient {
    tools: HashMap<&'static str, Arc<dyn Tool>>,
    retry: RetryPolicy,
}

impl ToolClient {
    pub fn new(retry: RetryPolicy) -> Self {
        Self {
            tools: HashMap::new(),
            retry,
        }
    }

    /// Build a client with every tool the configuration enables.
    ///
    /// Search-backed tools need their base URL set; tools without one are
    /// skipped and later lookups report them as unknown.
    pub fn from_config(config: &ToolsConfig) -> AgentResult<Self> {
        let mut client = Self::new(RetryPolicy::from(&config.retry));
        if config.search_base_url.is_some() {
            client.register(Arc::new(WebSearchTool::new(config)?));
            client.register(Arc::new(ImageSearchTool::new(config)?));
        } else {
            tracing::debug!("search_base_url not set, search tools disabled");
        }
        if config.patent_base_url.is_some() {
            client.register(Arc::new(PatentSearchTool::new(config)?));
        } else {
            tracing::debug!("patent_base_url not set, patent search disabled");
        }
        client.register(Arc::new(ContentExtractTool::new(config)?));
        Ok(client)
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name(), tool);
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names in stable order.
    pub fn tool_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.tools.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Validate and execute a tool call, retrying transient failures.
    ///
    /// Validation errors are returned before any execution attempt and
    /// are never retried.
    pub async fn dispatch(&self, tool_name: &str, params: &Value) -> AgentResult<ToolOutput> {
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| AgentError::ToolNotFound(tool_name.to_string()))?;

        tool.validate(params)?;
        self.retry.execute(|| tool.execute(params)).await
    }

    /// Execute a tool call and record it as an invocation, success or not.
    pub async fn invoke(&self, tool_name: &str, params: Value) -> ToolInvocation {
        let started = Instant::now();
        let outcome = match self.dispatch(tool_name, &params).await {
            Ok(output) => ToolOutcome::Success(output.data),
            Err(e) => {
                tracing::warn!(tool = tool_name, error = %e, "tool invocation failed");
                ToolOutcome::Error(e.to_string())
            }
        };
        ToolInvocation {
            tool_name: tool_name.to_string(),
            params,
            outcome,
            latency: started.elapsed(),
        }
    }
}
