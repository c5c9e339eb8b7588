//! Per-request lifecycle state machine.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{AgentError, AgentResult};

/// Lifecycle of a single request through the runtime.
///
/// `Failed` is reachable only from the generation states: retrieval and
/// tool problems degrade the response, they never fail the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Received,
    Classified,
    Retrieving,
    ToolAugmenting,
    Generating,
    ProviderRetry,
    Completed,
    Failed,
}

impl Default for RequestState {
    fn default() -> Self {
        Self::Received
    }
}

impl RequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Classified => "classified",
            Self::Retrieving => "retrieving",
            Self::ToolAugmenting => "tool_augmenting",
            Self::Generating => "generating",
            Self::ProviderRetry => "provider_retry",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Valid transitions from this state.
    pub fn valid_transitions(&self) -> Vec<RequestState> {
        match self {
            Self::Received => vec![Self::Classified],
            Self::Classified => vec![Self::Retrieving],
            Self::Retrieving => vec![Self::ToolAugmenting, Self::Generating],
            Self::ToolAugmenting => vec![Self::Generating],
            Self::Generating => vec![Self::ProviderRetry, Self::Completed, Self::Failed],
            Self::ProviderRetry => vec![Self::Generating, Self::Completed, Self::Failed],
            Self::Completed | Self::Failed => vec![],
        }
    }

    pub fn can_transition_to(&self, next: Self) -> bool {
        self.valid_transitions().contains(&next)
    }

    /// Move to `next`, rejecting transitions the lifecycle does not allow.
    pub fn transition(&mut self, next: Self) -> AgentResult<()> {
        if !self.can_transition_to(next) {
            return Err(AgentError::InvalidStateTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        tracing::debug!(from = self.as_str(), to = next.as_str(), "request state transition");
        *self = next;
        Ok(())
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_without_tools() {
        let mut state = RequestState::Received;
        state.transition(RequestState::Classified).unwrap();
        state.transition(RequestState::Retrieving).unwrap();
        state.transition(RequestState::Generating).unwrap();
        state.transition(RequestState::Completed).unwrap();
        assert!(state.is_terminal());
    }

    #[test]
    fn test_happy_path_with_tools_and_retry() {
        let mut state = RequestState::Received;
        state.transition(RequestState::Classified).unwrap();
        state.transition(RequestState::Retrieving).unwrap();
        state.transition(RequestState::ToolAugmenting).unwrap();
        state.transition(RequestState::Generating).unwrap();
        state.transition(RequestState::ProviderRetry).unwrap();
        state.transition(RequestState::Generating).unwrap();
        state.transition(RequestState::Completed).unwrap();
    }

    #[test]
    fn test_failed_only_from_generation() {
        let mut state = RequestState::Retrieving;
        let err = state.transition(RequestState::Failed).unwrap_err();
        assert!(matches!(err, AgentError::InvalidStateTransition { .. }));

        let mut state = RequestState::Generating;
        state.transition(RequestState::Failed).unwrap();

        let mut state = RequestState::ProviderRetry;
        state.transition(RequestState::Failed).unwrap();
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        assert!(RequestState::Completed.valid_transitions().is_empty());
        assert!(RequestState::Failed.valid_transitions().is_empty());
    }

    #[test]
    fn test_cannot_skip_classification() {
        let mut state = RequestState::Received;
        assert!(state.transition(RequestState::Retrieving).is_err());
    }
}
