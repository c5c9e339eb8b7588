//! Domain errors for the Counsel agent runtime.

use thiserror::Error;

use crate::domain::models::ProviderAttempt;

/// Format per-provider failure reasons as `A: timeout; B: rate limited`.
fn format_attempts(attempts: &[ProviderAttempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}: {}", a.provider, a.outcome))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Domain-level errors that can occur in the Counsel runtime.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Dimension mismatch for collection {collection}: expected {expected}, got {got}")]
    DimensionMismatch {
        collection: String,
        expected: usize,
        got: usize,
    },

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid parameters for tool {tool}: {reason}")]
    InvalidToolParams { tool: String, reason: String },

    #[error("Tool {tool} execution failed: {reason}")]
    ToolExecutionFailed { tool: String, reason: String },

    #[error("Transient failure from tool {tool}: {reason}")]
    TransientTool { tool: String, reason: String },

    #[error("Transient provider error from {provider}: {reason}")]
    TransientProvider { provider: String, reason: String },

    #[error("Fatal provider error from {provider}: {reason}")]
    FatalProvider { provider: String, reason: String },

    #[error("All providers exhausted: {}", format_attempts(.attempts))]
    AllProvidersExhausted { attempts: Vec<ProviderAttempt> },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Request deadline exceeded after {0} ms")]
    DeadlineExceeded(u64),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type AgentResult<T> = Result<T, AgentError>;

impl AgentError {
    /// Returns true for errors that warrant another attempt (next provider
    /// at the gateway, bounded retry at the tool client).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AgentError::TransientProvider { .. }
                | AgentError::TransientTool { .. }
                | AgentError::DeadlineExceeded(_)
        )
    }

    /// Returns true for errors that must abort the provider chain immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AgentError::FatalProvider { .. } | AgentError::InvalidToolParams { .. }
        )
    }
}

impl From<sqlx::Error> for AgentError {
    fn from(err: sqlx::Error) -> Self {
        AgentError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::AttemptOutcome;
    use std::time::Duration;

    #[test]
    fn test_transient_classification() {
        let err = AgentError::TransientProvider {
            provider: "openai".to_string(),
            reason: "429".to_string(),
        };
        assert!(err.is_transient());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_fatal_classification() {
        let err = AgentError::FatalProvider {
            provider: "anthropic".to_string(),
            reason: "401 unauthorized".to_string(),
        };
        assert!(err.is_fatal());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_exhausted_message_lists_reasons() {
        let attempts = vec![
            ProviderAttempt {
                provider: "a".to_string(),
                outcome: AttemptOutcome::TransientError("timeout".to_string()),
                latency: Duration::from_millis(100),
                tokens_used: None,
            },
            ProviderAttempt {
                provider: "b".to_string(),
                outcome: AttemptOutcome::TransientError("503".to_string()),
                latency: Duration::from_millis(50),
                tokens_used: None,
            },
        ];
        let err = AgentError::AllProvidersExhausted { attempts };
        let msg = err.to_string();
        assert!(msg.contains("a: "));
        assert!(msg.contains("b: "));
        assert!(msg.contains("timeout"));
    }
}
