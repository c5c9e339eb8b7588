//! Request router and supervisor.
//!
//! Classification is keyword scoring over weighted per-domain signal
//! lists; confidence is the winning domain's share of the total matched
//! weight. Dispatch hands the request to the matching agent and drives
//! the [`RequestState`] lifecycle, with the overall deadline enforced
//! here rather than inside the agents.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::{
    AgentRequest, AgentResponse, Domain, RequestState, RouterConfig, RoutingDecision,
};
use crate::domain::ports::DomainAgent;

/// Weighted classification signals for one domain. Matching is
/// case-insensitive substring containment, so `patent` also fires on
/// `patentable`.
fn signals(domain: Domain) -> &'static [(&'static str, f32)] {
    match domain {
        Domain::Pitch => &[
            ("pitch", 3.0),
            ("deck", 3.0),
            ("investor", 2.0),
            ("fundraising", 2.0),
            ("slide", 2.0),
            ("valuation", 2.0),
            ("series a", 2.0),
        ],
        Domain::Competitive => &[
            ("competitor", 3.0),
            ("rival", 3.0),
            ("compete", 2.0),
            ("market share", 2.0),
            ("landscape", 2.0),
            ("versus", 1.0),
            ("alternative", 1.0),
        ],
        Domain::Marketing => &[
            ("marketing", 3.0),
            ("campaign", 3.0),
            ("brand", 2.0),
            ("audience", 2.0),
            ("social media", 2.0),
            ("seo", 2.0),
            ("messaging", 1.0),
        ],
        Domain::Patent => &[
            ("patent", 3.0),
            ("prior art", 3.0),
            ("uspto", 3.0),
            ("invention", 2.0),
            ("intellectual property", 2.0),
            ("infringement", 2.0),
            ("claim", 1.0),
        ],
        Domain::Policy => &[
            ("policy", 3.0),
            ("compliance", 3.0),
            ("gdpr", 3.0),
            ("privacy", 2.0),
            ("regulation", 2.0),
            ("data retention", 2.0),
            ("legal", 1.0),
        ],
        Domain::Team => &[
            ("hiring", 3.0),
            ("hire", 2.0),
            ("recruit", 2.0),
            ("onboarding", 2.0),
            ("compensation", 2.0),
            ("headcount", 2.0),
            ("team", 1.0),
        ],
        Domain::Generic => &[],
    }
}

pub struct Router {
    agents: Vec<Arc<dyn DomainAgent>>,
    confidence_threshold: f32,
    request_deadline_ms: u64,
}

impl Router {
    pub fn new(
        agents: Vec<Arc<dyn DomainAgent>>,
        config: &RouterConfig,
        request_deadline_ms: u64,
    ) -> Self {
        Self {
            agents,
            confidence_threshold: config.confidence_threshold,
            request_deadline_ms,
        }
    }

    /// Score the message against every routable domain.
    ///
    /// The winner's confidence is its score divided by the total matched
    /// weight across all domains; ties keep the earlier domain in routing
    /// priority order. No match at all, or a winner below the threshold,
    /// falls back to the generic agent.
    pub fn classify(&self, message: &str) -> RoutingDecision {
        let haystack = message.to_lowercase();

        let mut total = 0.0_f32;
        let mut best: Option<(Domain, f32, &'static str)> = None;
        for &domain in Domain::routable() {
            let mut score = 0.0_f32;
            let mut strongest: Option<(&'static str, f32)> = None;
            for &(keyword, weight) in signals(domain) {
                if haystack.contains(keyword) {
                    score += weight;
                    if strongest.map_or(true, |(_, w)| weight > w) {
                        strongest = Some((keyword, weight));
                    }
                }
            }
            total += score;
            if let Some((keyword, _)) = strongest {
                if best.map_or(true, |(_, s, _)| score > s) {
                    best = Some((domain, score, keyword));
                }
            }
        }

        let decision = match best {
            None => RoutingDecision {
                domain: Domain::Generic,
                confidence: 0.0,
                matched_signal: "no signal".to_string(),
            },
            Some((domain, score, keyword)) => {
                let confidence = score / total;
                let domain = if confidence < self.confidence_threshold {
                    Domain::Generic
                } else {
                    domain
                };
                RoutingDecision {
                    domain,
                    confidence,
                    matched_signal: keyword.to_string(),
                }
            }
        };
        tracing::debug!(
            domain = %decision.domain,
            confidence = decision.confidence,
            signal = %decision.matched_signal,
            "message classified"
        );
        decision
    }

    /// Invoke the agent serving the decision's domain, falling back to the
    /// generic agent when no specialist is registered.
    pub async fn dispatch(
        &self,
        decision: &RoutingDecision,
        request: &AgentRequest,
    ) -> AgentResult<AgentResponse> {
        let agent = self
            .agents
            .iter()
            .find(|a| a.domain() == decision.domain)
            .or_else(|| self.agents.iter().find(|a| a.domain() == Domain::Generic))
            .ok_or_else(|| {
                AgentError::Config(format!("no agent registered for domain {}", decision.domain))
            })?;
        agent.handle(request).await
    }

    /// Classify and serve one question end to end.
    ///
    /// The state machine records the milestones the supervisor can observe:
    /// classification up front, then the tool-augmentation and retry legs
    /// reconstructed from the response. Provider exhaustion surfaces as
    /// `ServiceUnavailable`; a blown deadline as `DeadlineExceeded`.
    pub async fn handle(&self, query: &str, context: Value) -> AgentResult<AgentResponse> {
        let decision = self.classify(query);
        self.handle_with(decision, query, context).await
    }

    /// Serve a question under a caller-supplied routing decision, for
    /// operators pinning the domain by hand.
    pub async fn handle_with(
        &self,
        decision: RoutingDecision,
        query: &str,
        context: Value,
    ) -> AgentResult<AgentResponse> {
        let request = AgentRequest::new(query, decision.domain).with_context(context);
        tracing::info!(
            request_id = %request.id,
            domain = %decision.domain,
            confidence = decision.confidence,
            "request routed"
        );

        let mut state = RequestState::default();
        state.transition(RequestState::Classified)?;
        state.transition(RequestState::Retrieving)?;

        let deadline = Duration::from_millis(self.request_deadline_ms);
        match tokio::time::timeout(deadline, self.dispatch(&decision, &request)).await {
            Ok(Ok(response)) => {
                if !response.tool_invocations.is_empty() {
                    state.transition(RequestState::ToolAugmenting)?;
                }
                state.transition(RequestState::Generating)?;
                if response.provider_attempts.len() > 1 {
                    state.transition(RequestState::ProviderRetry)?;
                }
                state.transition(RequestState::Completed)?;
                Ok(response)
            }
            Ok(Err(err)) => {
                state.transition(RequestState::Generating)?;
                state.transition(RequestState::Failed)?;
                tracing::warn!(request_id = %request.id, error = %err, "request failed");
                match err {
                    AgentError::AllProvidersExhausted { .. } => {
                        Err(AgentError::ServiceUnavailable(err.to_string()))
                    }
                    other => Err(other),
                }
            }
            Err(_) => {
                state.transition(RequestState::Generating)?;
                state.transition(RequestState::Failed)?;
                tracing::warn!(
                    request_id = %request.id,
                    deadline_ms = self.request_deadline_ms,
                    "request deadline exceeded"
                );
                Err(AgentError::DeadlineExceeded(self.request_deadline_ms))
            }
        }
    }
}
