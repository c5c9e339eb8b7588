//! Domain agents: six specialist variants plus the generic fallback, all
//! driven by one shared runtime.

pub mod competitive;
pub mod generic;
pub mod marketing;
pub mod patent;
pub mod pitch;
pub mod policy;
pub mod prompt;
pub mod runtime;
mod structured;
pub mod team;

use std::sync::Arc;

use crate::domain::ports::DomainAgent;

pub use competitive::CompetitiveAgent;
pub use generic::GenericAgent;
pub use marketing::MarketingAgent;
pub use patent::PatentAgent;
pub use pitch::PitchAgent;
pub use policy::PolicyAgent;
pub use runtime::{AgentRuntime, AgentVariant};
pub use team::TeamAgent;

/// Construct the full agent roster over one shared runtime. The generic
/// fallback comes last; the router only reaches it below the confidence
/// threshold.
pub fn build_agents(runtime: &Arc<AgentRuntime>) -> Vec<Arc<dyn DomainAgent>> {
    vec![
        Arc::new(PitchAgent::new(runtime.clone())),
        Arc::new(CompetitiveAgent::new(runtime.clone())),
        Arc::new(MarketingAgent::new(runtime.clone())),
        Arc::new(PatentAgent::new(runtime.clone())),
        Arc::new(PolicyAgent::new(runtime.clone())),
        Arc::new(TeamAgent::new(runtime.clone())),
        Arc::new(GenericAgent::new(runtime.clone())),
    ]
}
